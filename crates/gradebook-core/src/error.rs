//! Domain-level error taxonomy for the gradebook pipeline.

use std::path::PathBuf;

/// Gradebook domain errors.
#[derive(Debug, thiserror::Error)]
pub enum GradebookError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid result document at {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("gradebook storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gradebook domain operations.
pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = GradebookError::Config("STUDENT_DIR not set".to_string());
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("STUDENT_DIR"));
    }

    #[test]
    fn test_invalid_document_carries_path() {
        let err = GradebookError::InvalidDocument {
            path: PathBuf::from("/tmp/autograder_results.json"),
            reason: "expected object".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("autograder_results.json"));
        assert!(msg.contains("expected object"));
    }
}
