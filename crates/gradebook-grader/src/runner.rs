//! Check execution against a submission directory.
//!
//! Each check in the manifest runs as a subprocess with captured output;
//! the submission's code only ever executes on the far side of that process
//! boundary. Exit status maps to a check outcome, and a spawn failure or
//! timeout is just a failed check, never a harness abort.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use gradebook_core::result_doc::{CheckOutcome, ResultDocument};

use crate::recorder::{CheckPhase, ScoreRecorder, SubmissionIdentity};

/// One entry in a checks manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Check identifier, recorded as the result document's `nodeid`.
    pub id: String,

    /// Command to execute (first element is the executable).
    pub command: Vec<String>,

    /// Points this check is worth (default 0).
    #[serde(default)]
    pub points: u32,

    /// Timeout in seconds; 0 means no timeout.
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Result of executing a single check.
#[derive(Debug, Clone)]
pub struct CheckRun {
    /// Check identifier.
    pub check_id: String,

    /// Terminal outcome.
    pub outcome: CheckOutcome,

    /// Exit code (-1 when the process never ran or was killed).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Load a checks manifest (JSON array of [`CheckSpec`]) from disk.
pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<CheckSpec>> {
    let contents = std::fs::read_to_string(path)?;
    let specs: Vec<CheckSpec> = serde_json::from_str(&contents)?;
    Ok(specs)
}

/// Runs a checks manifest and feeds outcomes to a [`ScoreRecorder`].
pub struct CheckRunner;

impl CheckRunner {
    /// Execute a single check inside the submission directory.
    ///
    /// Never returns an error: a check that cannot be spawned, exits
    /// non-zero, or times out is reported as failed.
    pub async fn execute(spec: &CheckSpec, submission_dir: &Path) -> CheckRun {
        let start = Instant::now();

        let failed = |stderr: String, start: Instant| CheckRun {
            check_id: spec.id.clone(),
            outcome: CheckOutcome::Failed,
            exit_code: -1,
            stdout: String::new(),
            stderr,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        let Some((exe, args)) = spec.command.split_first() else {
            return failed(format!("check {} has empty command", spec.id), start);
        };

        let child = Command::new(exe)
            .args(args)
            .current_dir(submission_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) => return failed(format!("failed to spawn {exe}: {e}"), start),
        };

        let output = if spec.timeout_secs > 0 {
            match tokio::time::timeout(
                std::time::Duration::from_secs(spec.timeout_secs),
                child.wait_with_output(),
            )
            .await
            {
                Ok(r) => r,
                Err(_) => {
                    return failed(
                        format!("check {} timed out after {} seconds", spec.id, spec.timeout_secs),
                        start,
                    )
                }
            }
        } else {
            child.wait_with_output().await
        };

        let output = match output {
            Ok(o) => o,
            Err(e) => return failed(format!("failed to collect output: {e}"), start),
        };

        CheckRun {
            check_id: spec.id.clone(),
            outcome: if output.status.success() {
                CheckOutcome::Passed
            } else {
                CheckOutcome::Failed
            },
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Run every check in order and write the submission's result document.
    pub async fn run_all(
        identity: SubmissionIdentity,
        specs: &[CheckSpec],
    ) -> anyhow::Result<(ResultDocument, Vec<CheckRun>)> {
        let mut recorder = ScoreRecorder::new(identity.clone());
        let mut runs = Vec::with_capacity(specs.len());

        for spec in specs {
            debug!(check = %spec.id, "executing check");
            let run = Self::execute(spec, identity.dir()).await;
            recorder.observe(&run.check_id, CheckPhase::Call, run.outcome, spec.points);
            runs.push(run);
        }

        let doc = recorder.finish()?;
        info!(earned = doc.earned, max = doc.max, "grading complete");
        Ok((doc, runs))
    }
}
