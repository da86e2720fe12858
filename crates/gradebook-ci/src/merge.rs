//! Gradebook merge: the aggregation pipeline orchestrator.
//!
//! One invocation is a fixed sequence: load seen run ids from the gradebook,
//! list recent runs, filter to new successes, fetch + extract each, then
//! commit all new rows in a single append. The commit is the only mutation
//! point: a crash anywhere before it leaves the gradebook untouched, and the
//! next invocation re-derives seen-state from the file, so reruns never
//! duplicate committed rows.
//!
//! Seen-state is *only* "committed run ids". A run whose artifact or result
//! document is missing is left out of this invocation and retried on every
//! future one until the artifact appears; no attempt count is persisted
//! anywhere.

use std::path::PathBuf;

use anyhow::Context;
use tracing::{debug, info};

use gradebook_core::row::GradebookRow;
use gradebook_core::store::GradebookStore;

use crate::extract::extract_row;
use crate::provider::{ArtifactFetch, CiProvider};
use crate::run::RunConclusion;

/// Configuration for one merge invocation.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Repository slug (`owner/repo`).
    pub repo: String,

    /// Grading workflow name.
    pub workflow: String,

    /// Artifact name produced by the workflow.
    pub artifact: String,

    /// How many recent runs to scan.
    pub limit: u32,

    /// Gradebook CSV path.
    pub out: PathBuf,
}

impl MergeConfig {
    /// Defaults matching the grading workflow's conventions.
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            workflow: "Autograde".to_string(),
            artifact: "autograder_result".to_string(),
            limit: 50,
            out: PathBuf::from("autograder/gradebook.csv"),
        }
    }
}

/// What one merge invocation committed.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Rows appended, in processing order. Empty when nothing was new.
    pub rows: Vec<GradebookRow>,

    /// The gradebook path that was (or would have been) appended to.
    pub gradebook: PathBuf,
}

impl MergeOutcome {
    pub fn appended(&self) -> usize {
        self.rows.len()
    }
}

/// The aggregation pipeline orchestrator.
pub struct GradebookMerger;

impl GradebookMerger {
    /// Run one merge invocation against `provider`.
    ///
    /// Runs are processed sequentially in the provider's listing order.
    /// Soft misses (artifact or result document absent) contribute nothing;
    /// a malformed result document aborts the whole invocation before any
    /// mutation of the gradebook.
    pub async fn run(
        provider: &dyn CiProvider,
        config: &MergeConfig,
    ) -> anyhow::Result<MergeOutcome> {
        let store = GradebookStore::new(&config.out);
        let seen = store
            .seen_run_ids()
            .context("failed to load existing gradebook")?;

        let runs = provider
            .list_runs(&config.repo, &config.workflow, config.limit)
            .await
            .context("failed to list workflow runs")?;
        info!(
            repo = %config.repo,
            workflow = %config.workflow,
            listed = runs.len(),
            seen = seen.len(),
            "scanning runs"
        );

        let scratch = tempfile::Builder::new()
            .prefix("gradebook_dl_")
            .tempdir()
            .context("failed to create scratch directory")?;

        let mut new_rows: Vec<GradebookRow> = Vec::new();

        for run in &runs {
            if run.conclusion != RunConclusion::Success {
                debug!(run_id = %run.run_id, "skipping non-success run");
                continue;
            }
            if seen.contains(&run.run_id) {
                debug!(run_id = %run.run_id, "skipping already-recorded run");
                continue;
            }

            let dest = scratch.path().join(&run.run_id);
            std::fs::create_dir_all(&dest)?;

            let fetch = provider
                .download_artifact(&run.run_id, &config.repo, &config.artifact, &dest)
                .await
                .with_context(|| format!("failed to download artifact for run {}", run.run_id))?;
            if fetch == ArtifactFetch::NotFound {
                continue;
            }

            match extract_row(&dest, &run.run_id)? {
                Some(row) => {
                    info!(run_id = %run.run_id, student = %row.student_id, "new gradebook row");
                    new_rows.push(row);
                }
                None => continue,
            }
        }

        if !new_rows.is_empty() {
            store
                .append(&new_rows)
                .context("failed to append to gradebook")?;
        }

        Ok(MergeOutcome {
            rows: new_rows,
            gradebook: config.out.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MergeConfig::new("course-org/grading");
        assert_eq!(config.workflow, "Autograde");
        assert_eq!(config.artifact, "autograder_result");
        assert_eq!(config.limit, 50);
        assert_eq!(config.out, PathBuf::from("autograder/gradebook.csv"));
    }

    #[test]
    fn test_outcome_appended_count() {
        let outcome = MergeOutcome {
            rows: vec![],
            gradebook: PathBuf::from("gradebook.csv"),
        };
        assert_eq!(outcome.appended(), 0);
    }
}
