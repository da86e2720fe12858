//! Gradebook Grader - score recording inside the grading environment
//!
//! Provides the components that run alongside a submission's checks:
//! - [`ScoreRecorder`] accumulates per-check outcomes into a points ledger
//!   and emits one result document per graded submission
//! - [`CheckRunner`] executes a checks manifest as subprocesses, keeping
//!   untrusted submission code behind a process boundary

pub mod recorder;
pub mod runner;

pub use recorder::{CheckPhase, ScoreRecorder, SubmissionIdentity, STUDENT_DIR_ENV};
pub use runner::{load_manifest, CheckRun, CheckRunner, CheckSpec};
