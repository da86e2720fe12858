//! Gradebook CI - result aggregation from the CI provider
//!
//! Drives the pipeline that turns successful grading runs into gradebook
//! rows:
//! - Lists recent workflow runs (`CiProvider::list_runs`)
//! - Downloads each run's result artifact into scratch space
//! - Extracts the normalized result document
//! - Merges new rows into the append-only gradebook, exactly once per run

pub mod extract;
pub mod fakes;
pub mod merge;
pub mod provider;
pub mod repo;
pub mod run;

pub use extract::{extract_row, find_result_file};
pub use merge::{GradebookMerger, MergeConfig, MergeOutcome};
pub use provider::{ArtifactFetch, CiProvider, CommandFailed, GhCli};
pub use repo::{detect_repo, parse_remote_url};
pub use run::{RunConclusion, RunRecord};
