//! Append-only CSV gradebook store.
//!
//! The gradebook file is the sole source of truth for "already processed"
//! run identifiers: seen-state is re-derived from the `run_id` column on
//! every load, and rows are only ever appended, never rewritten. The header
//! is written once, when the file is first created.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GradebookError, Result};
use crate::row::GradebookRow;

/// Column order of the persisted gradebook.
pub const GRADEBOOK_HEADER: &str = "student_id,final_score,max_points,submitted_at,run_id";

/// Handle on a gradebook CSV file.
#[derive(Debug, Clone)]
pub struct GradebookStore {
    path: PathBuf,
}

impl GradebookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Collect the set of run ids already committed to the gradebook.
    ///
    /// A missing file is not an error (first invocation); it yields an
    /// empty set.
    pub fn seen_run_ids(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let mut lines = contents.lines();

        let header = match lines.next() {
            Some(h) => h,
            None => return Ok(HashSet::new()),
        };
        let run_id_col = parse_csv_line(header)
            .iter()
            .position(|name| name == "run_id")
            .ok_or_else(|| {
                GradebookError::Storage(format!(
                    "gradebook {} has no run_id column",
                    self.path.display()
                ))
            })?;

        let mut seen = HashSet::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let fields = parse_csv_line(line);
            if let Some(rid) = fields.get(run_id_col) {
                let rid = rid.trim();
                if !rid.is_empty() {
                    seen.insert(rid.to_string());
                }
            }
        }
        debug!(path = %self.path.display(), count = seen.len(), "loaded seen run ids");
        Ok(seen)
    }

    /// Append rows to the gradebook, creating it (with header) if absent.
    ///
    /// This is the single mutation point of the pipeline: all rows from one
    /// invocation land in one append.
    pub fn append(&self, rows: &[GradebookRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let write_header = !self.path.exists();
        let mut buf = String::new();
        if write_header {
            buf.push_str(GRADEBOOK_HEADER);
            buf.push('\n');
        }
        for row in rows {
            buf.push_str(&format_csv_line(&[
                &row.student_id,
                &row.final_score.to_string(),
                &row.max_points.to_string(),
                &row.submitted_at,
                &row.run_id,
            ]));
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf.as_bytes())?;
        debug!(path = %self.path.display(), rows = rows.len(), "appended gradebook rows");
        Ok(())
    }
}

/// Render one CSV record, quoting fields that contain `,`, `"`, or newlines.
fn format_csv_line(fields: &[&str]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out
}

/// Split one CSV record, honoring quoted fields and doubled quotes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(student: &str, run_id: &str) -> GradebookRow {
        GradebookRow {
            student_id: student.to_string(),
            final_score: 8,
            max_points: 10,
            submitted_at: String::new(),
            run_id: run_id.to_string(),
        }
    }

    #[test]
    fn test_seen_run_ids_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = GradebookStore::new(dir.path().join("gradebook.csv"));
        assert!(store.seen_run_ids().unwrap().is_empty());
    }

    #[test]
    fn test_header_written_on_first_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.csv");
        let store = GradebookStore::new(&path);

        store.append(&[sample_row("u1", "1")]).unwrap();
        store.append(&[sample_row("u2", "2")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header_count = contents
            .lines()
            .filter(|l| *l == GRADEBOOK_HEADER)
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.lines().next().unwrap() == GRADEBOOK_HEADER);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autograder").join("gradebook.csv");
        let store = GradebookStore::new(&path);
        store.append(&[sample_row("u1", "1")]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_append_then_reload_seen_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = GradebookStore::new(dir.path().join("gradebook.csv"));
        store
            .append(&[sample_row("u1", "101"), sample_row("u2", "102")])
            .unwrap();

        let seen = store.seen_run_ids().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("101"));
        assert!(seen.contains("102"));
    }

    #[test]
    fn test_empty_append_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.csv");
        GradebookStore::new(&path).append(&[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_run_id_column_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradebook.csv");
        std::fs::write(&path, "student_id,final_score\nu1,8\n").unwrap();
        let err = GradebookStore::new(&path).seen_run_ids().unwrap_err();
        assert!(matches!(err, GradebookError::Storage(_)));
    }

    #[test]
    fn test_csv_quoting_round_trip() {
        let line = format_csv_line(&["a,b", "say \"hi\"", "plain"]);
        assert_eq!(line, "\"a,b\",\"say \"\"hi\"\"\",plain");
        let fields = parse_csv_line(&line);
        assert_eq!(fields, vec!["a,b", "say \"hi\"", "plain"]);
    }
}
