//! Persisted gradebook rows derived from result documents.

use serde::{Deserialize, Serialize};

use crate::result_doc::ResultDocument;

/// Sentinel student id used when the submission path carries no identity.
pub const UNKNOWN_STUDENT: &str = "UNKNOWN";

/// One persisted, deduplicated record of a graded submission.
///
/// `run_id` is the deduplication key: the gradebook never holds two rows
/// with the same run id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GradebookRow {
    /// Last path segment of the submission directory, or `UNKNOWN`.
    pub student_id: String,

    /// Explicit final score when the document carries one, else `earned`.
    pub final_score: i64,

    /// Total points possible.
    pub max_points: u32,

    /// Producer-supplied timestamp, possibly empty.
    pub submitted_at: String,

    /// CI run identifier this row was extracted from.
    pub run_id: String,
}

impl GradebookRow {
    /// Derive a row from a result document and the run that produced it.
    pub fn from_document(doc: &ResultDocument, run_id: &str) -> Self {
        Self {
            student_id: derive_student_id(&doc.student_dir),
            final_score: doc.effective_score(),
            max_points: doc.max,
            submitted_at: doc.submitted_at.clone().unwrap_or_default(),
            run_id: run_id.to_string(),
        }
    }
}

/// Extract the student id from a submission directory path.
///
/// Strips leading/trailing `/` and takes the final path segment. An empty
/// path, or a path that reduces to nothing, yields [`UNKNOWN_STUDENT`].
pub fn derive_student_id(student_dir: &str) -> String {
    let trimmed = student_dir.trim_matches('/');
    match trimmed.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => UNKNOWN_STUDENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_from_trailing_slash_path() {
        assert_eq!(derive_student_id("/submissions/abc123/"), "abc123");
    }

    #[test]
    fn test_student_id_from_plain_path() {
        assert_eq!(derive_student_id("submissions/u42"), "u42");
    }

    #[test]
    fn test_student_id_empty_is_unknown() {
        assert_eq!(derive_student_id(""), UNKNOWN_STUDENT);
        assert_eq!(derive_student_id("/"), UNKNOWN_STUDENT);
        assert_eq!(derive_student_id("///"), UNKNOWN_STUDENT);
    }

    #[test]
    fn test_row_from_document_uses_earned_by_default() {
        let doc: ResultDocument = serde_json::from_str(
            r#"{"earned": 8, "max": 10, "details": [], "student_dir": "/s/u1"}"#,
        )
        .unwrap();
        let row = GradebookRow::from_document(&doc, "12345");
        assert_eq!(row.student_id, "u1");
        assert_eq!(row.final_score, 8);
        assert_eq!(row.max_points, 10);
        assert_eq!(row.submitted_at, "");
        assert_eq!(row.run_id, "12345");
    }

    #[test]
    fn test_row_from_document_prefers_final_score() {
        let doc: ResultDocument = serde_json::from_str(
            r#"{"earned": 8, "max": 10, "details": [], "student_dir": "/s/u1", "final_score": 10}"#,
        )
        .unwrap();
        let row = GradebookRow::from_document(&doc, "1");
        assert_eq!(row.final_score, 10);
    }
}
