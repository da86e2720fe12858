//! Gradebook Core Library
//!
//! Domain model shared by the grading environment and the aggregation
//! pipeline: the normalized result document, persisted gradebook rows,
//! the append-only CSV store, and tracing bootstrap.

pub mod error;
pub mod result_doc;
pub mod row;
pub mod store;
pub mod telemetry;

pub use error::{GradebookError, Result};
pub use result_doc::{CheckOutcome, CheckResult, ResultDocument, RESULT_FILE_NAME};
pub use row::{derive_student_id, GradebookRow, UNKNOWN_STUDENT};
pub use store::{GradebookStore, GRADEBOOK_HEADER};
pub use telemetry::init_tracing;
