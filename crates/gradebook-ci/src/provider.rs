//! CI provider seam: run listing and artifact download.
//!
//! The pipeline talks to the provider through [`CiProvider`] so tests can
//! substitute an in-memory fake. The production implementation, [`GhCli`],
//! shells out to the `gh` command-line tool.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::run::{RunRecord, WireRun};

/// Outcome of an artifact download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFetch {
    /// Artifact files were materialized under the destination directory.
    Fetched,
    /// The provider had no such artifact for this run. Not an error.
    NotFound,
}

/// A provider command that exited non-zero, with captured output for
/// diagnosis.
#[derive(Debug, thiserror::Error)]
#[error("command failed: {command}\nSTDOUT:\n{stdout}\nSTDERR:\n{stderr}")]
pub struct CommandFailed {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

/// CI provider surface used by the aggregation pipeline.
#[async_trait]
pub trait CiProvider: Send + Sync {
    /// List up to `limit` most-recent runs of `workflow`, newest first.
    ///
    /// Provider failure is fatal for the whole invocation: with no listing
    /// there is nothing to aggregate.
    async fn list_runs(
        &self,
        repo: &str,
        workflow: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<RunRecord>>;

    /// Materialize the named artifact of `run_id` into `dest`.
    ///
    /// Any provider refusal (artifact missing, run expired) maps to
    /// [`ArtifactFetch::NotFound`]; only local I/O trouble is an error.
    async fn download_artifact(
        &self,
        run_id: &str,
        repo: &str,
        artifact: &str,
        dest: &Path,
    ) -> anyhow::Result<ArtifactFetch>;
}

/// Production provider backed by the `gh` CLI.
pub struct GhCli;

impl GhCli {
    async fn run_gh(args: &[&str]) -> anyhow::Result<std::process::Output> {
        let output = Command::new("gh")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output)
    }
}

#[async_trait]
impl CiProvider for GhCli {
    async fn list_runs(
        &self,
        repo: &str,
        workflow: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<RunRecord>> {
        let limit_str = limit.to_string();
        let args = [
            "run",
            "list",
            "--repo",
            repo,
            "--workflow",
            workflow,
            "--limit",
            &limit_str,
            "--json",
            "databaseId,conclusion",
        ];
        let output = Self::run_gh(&args).await?;

        if !output.status.success() {
            return Err(CommandFailed {
                command: format!("gh {}", args.join(" ")),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
            .into());
        }

        let wire: Vec<WireRun> = serde_json::from_slice(&output.stdout)?;
        Ok(wire.into_iter().map(RunRecord::from).collect())
    }

    async fn download_artifact(
        &self,
        run_id: &str,
        repo: &str,
        artifact: &str,
        dest: &Path,
    ) -> anyhow::Result<ArtifactFetch> {
        let dest_str = dest.to_string_lossy();
        let output = Self::run_gh(&[
            "run",
            "download",
            run_id,
            "--repo",
            repo,
            "--name",
            artifact,
            "--dir",
            &dest_str,
        ])
        .await?;

        if output.status.success() {
            Ok(ArtifactFetch::Fetched)
        } else {
            // A successful-looking run may legitimately lack the artifact.
            debug!(run_id, artifact, "artifact not found");
            Ok(ArtifactFetch::NotFound)
        }
    }
}
