//! The normalized result document produced by one grading execution.
//!
//! A [`ResultDocument`] is written exactly once per graded submission, under
//! the submission directory as [`RESULT_FILE_NAME`], and read exactly once by
//! the aggregation pipeline. It is immutable after the write.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed file name of the result document inside a run artifact.
pub const RESULT_FILE_NAME: &str = "autograder_results.json";

/// Terminal outcome of a single check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Passed,
    Failed,
    Skipped,
}

/// Per-check entry in the result document's `details` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResult {
    /// Check identifier (wire key `nodeid`).
    #[serde(rename = "nodeid")]
    pub check_id: String,

    /// Terminal outcome.
    pub outcome: CheckOutcome,

    /// Points awarded (declared points on pass, 0 otherwise).
    pub points: u32,

    /// Points the check was worth.
    pub max_points: u32,
}

/// One submission's normalized grading result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultDocument {
    /// Total points awarded across all checks.
    pub earned: u32,

    /// Total points possible across all checks. Invariant: `earned <= max`.
    pub max: u32,

    /// Per-check outcomes, in execution order.
    pub details: Vec<CheckResult>,

    /// Identity path of the submission (last segment is the student id).
    #[serde(default)]
    pub student_dir: String,

    /// Producer-supplied submission timestamp, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,

    /// Explicit final score. Overrides `earned` when present; a float is
    /// truncated toward zero, non-numeric input fails parsing.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_truncated_int"
    )]
    pub final_score: Option<i64>,
}

impl ResultDocument {
    /// The score to persist: explicit `final_score` when present, else `earned`.
    pub fn effective_score(&self) -> i64 {
        self.final_score.unwrap_or(i64::from(self.earned))
    }
}

fn deserialize_truncated_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("final_score is not an integer: {n}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_round_trip() {
        let doc = ResultDocument {
            earned: 8,
            max: 10,
            details: vec![CheckResult {
                check_id: "tests/test_lab00.py::test_submission_check_format".to_string(),
                outcome: CheckOutcome::Passed,
                points: 1,
                max_points: 1,
            }],
            student_dir: "/submissions/abc123".to_string(),
            submitted_at: Some("2026-01-05T10:00:00Z".to_string()),
            final_score: None,
        };

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"nodeid\""));
        assert!(json.contains("\"passed\""));
        assert!(!json.contains("final_score"));

        let back: ResultDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_parse_minimal_document() {
        let doc: ResultDocument =
            serde_json::from_str(r#"{"earned": 8, "max": 10, "details": []}"#).unwrap();
        assert_eq!(doc.earned, 8);
        assert_eq!(doc.student_dir, "");
        assert_eq!(doc.submitted_at, None);
        assert_eq!(doc.effective_score(), 8);
    }

    #[test]
    fn test_final_score_overrides_earned() {
        let doc: ResultDocument =
            serde_json::from_str(r#"{"earned": 8, "max": 10, "details": [], "final_score": 9}"#)
                .unwrap();
        assert_eq!(doc.effective_score(), 9);
    }

    #[test]
    fn test_final_score_float_truncates() {
        let doc: ResultDocument =
            serde_json::from_str(r#"{"earned": 8, "max": 10, "details": [], "final_score": 8.7}"#)
                .unwrap();
        assert_eq!(doc.final_score, Some(8));
    }

    #[test]
    fn test_final_score_non_numeric_fails() {
        let result = serde_json::from_str::<ResultDocument>(
            r#"{"earned": 8, "max": 10, "details": [], "final_score": "high"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_wire_strings() {
        assert_eq!(
            serde_json::to_string(&CheckOutcome::Skipped).unwrap(),
            "\"skipped\""
        );
        let outcome: CheckOutcome = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(outcome, CheckOutcome::Failed);
    }
}
