//! Result extraction from fetched artifact bundles.
//!
//! The extractor searches a run's scratch subdirectory for the fixed-name
//! result document. Absence is a soft miss (the artifact may be empty or
//! contain unrelated files); a document that is present but unparseable is
//! fatal, since silently skipping it would lose a detectable grading
//! anomaly.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use gradebook_core::error::{GradebookError, Result};
use gradebook_core::result_doc::{ResultDocument, RESULT_FILE_NAME};
use gradebook_core::row::GradebookRow;

/// Find the result document anywhere under `dir`.
pub fn find_result_file(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == RESULT_FILE_NAME)
        .map(|entry| entry.into_path())
}

/// Extract a gradebook row for `run_id` from its scratch subdirectory.
///
/// Returns `Ok(None)` on a soft miss (no result file), `Err` on a result
/// file that does not parse as a [`ResultDocument`].
pub fn extract_row(scratch_dir: &Path, run_id: &str) -> Result<Option<GradebookRow>> {
    let Some(path) = find_result_file(scratch_dir) else {
        debug!(run_id, dir = %scratch_dir.display(), "no result document in artifact");
        return Ok(None);
    };

    let contents = std::fs::read_to_string(&path)?;
    let doc: ResultDocument =
        serde_json::from_str(&contents).map_err(|e| GradebookError::InvalidDocument {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    Ok(Some(GradebookRow::from_document(&doc, run_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_result_file_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("artifact").join("inner");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join(RESULT_FILE_NAME), "{}").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), "noise").unwrap();

        let found = find_result_file(dir.path()).unwrap();
        assert_eq!(found, nested.join(RESULT_FILE_NAME));
    }

    #[test]
    fn test_missing_result_file_is_soft_miss() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.json"), "{}").unwrap();
        assert!(find_result_file(dir.path()).is_none());
        assert!(extract_row(dir.path(), "1").unwrap().is_none());
    }

    #[test]
    fn test_extract_row_from_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(RESULT_FILE_NAME),
            r#"{"earned": 8, "max": 10, "details": [], "student_dir": "/submissions/abc123/"}"#,
        )
        .unwrap();

        let row = extract_row(dir.path(), "42").unwrap().unwrap();
        assert_eq!(row.student_id, "abc123");
        assert_eq!(row.final_score, 8);
        assert_eq!(row.max_points, 10);
        assert_eq!(row.run_id, "42");
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RESULT_FILE_NAME), "{not json").unwrap();

        let err = extract_row(dir.path(), "42").unwrap_err();
        assert!(matches!(err, GradebookError::InvalidDocument { .. }));
    }
}
