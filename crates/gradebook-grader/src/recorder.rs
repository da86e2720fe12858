//! Score recorder for one grading execution.
//!
//! A [`ScoreRecorder`] attaches to the execution of an ordered sequence of
//! checks for a single submission, accumulates a points ledger, and emits
//! exactly one [`ResultDocument`] when the suite completes, no matter how
//! many checks failed.
//!
//! Submission identity is explicit configuration: the recorder takes a
//! [`SubmissionIdentity`] at construction. Reading the `STUDENT_DIR`
//! environment variable happens only at the binary edge, via
//! [`SubmissionIdentity::from_env`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use gradebook_core::error::{GradebookError, Result};
use gradebook_core::result_doc::{CheckOutcome, CheckResult, ResultDocument, RESULT_FILE_NAME};

/// Environment variable naming the submission's working directory.
pub const STUDENT_DIR_ENV: &str = "STUDENT_DIR";

/// Identity of the submission being graded.
#[derive(Debug, Clone)]
pub struct SubmissionIdentity {
    dir: PathBuf,
}

impl SubmissionIdentity {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the identity from `STUDENT_DIR`.
    ///
    /// Absence is a configuration error: without an identity the result
    /// document has nowhere to go.
    pub fn from_env() -> Result<Self> {
        match std::env::var(STUDENT_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Ok(Self::new(dir)),
            _ => Err(GradebookError::Config(format!(
                "{STUDENT_DIR_ENV} environment variable not set"
            ))),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where this submission's result document is written.
    pub fn result_path(&self) -> PathBuf {
        self.dir.join(RESULT_FILE_NAME)
    }
}

/// Lifecycle phase of a check execution.
///
/// Only the terminal [`CheckPhase::Call`] phase contributes to the ledger;
/// setup and teardown phases of the same check are ignored so a multi-phase
/// check cannot be counted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckPhase {
    Setup,
    Call,
    Teardown,
}

/// Accumulates check outcomes and emits one result document per submission.
#[derive(Debug)]
pub struct ScoreRecorder {
    identity: SubmissionIdentity,
    details: Vec<CheckResult>,
    recorded: HashSet<String>,
}

impl ScoreRecorder {
    pub fn new(identity: SubmissionIdentity) -> Self {
        Self {
            identity,
            details: Vec::new(),
            recorded: HashSet::new(),
        }
    }

    /// Record one check observation.
    ///
    /// Contributes at most once per `check_id`, keyed by the terminal
    /// phase. The declared points count toward `max` regardless of outcome;
    /// they count toward `earned` only on a pass.
    pub fn observe(
        &mut self,
        check_id: &str,
        phase: CheckPhase,
        outcome: CheckOutcome,
        declared_points: u32,
    ) {
        if phase != CheckPhase::Call {
            return;
        }
        if !self.recorded.insert(check_id.to_string()) {
            debug!(check = check_id, "duplicate terminal observation ignored");
            return;
        }

        self.details.push(CheckResult {
            check_id: check_id.to_string(),
            outcome,
            points: if outcome == CheckOutcome::Passed {
                declared_points
            } else {
                0
            },
            max_points: declared_points,
        });
    }

    /// Points awarded so far.
    pub fn earned(&self) -> u32 {
        self.details.iter().map(|d| d.points).sum()
    }

    /// Points possible so far.
    pub fn max(&self) -> u32 {
        self.details.iter().map(|d| d.max_points).sum()
    }

    /// Finalize the ledger and write the result document.
    ///
    /// Creates parent directories as needed and overwrites any prior
    /// document at the same path (last-write-wins per submission).
    pub fn finish(self) -> Result<ResultDocument> {
        let doc = ResultDocument {
            earned: self.earned(),
            max: self.max(),
            details: self.details,
            student_dir: self.identity.dir.to_string_lossy().into_owned(),
            submitted_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            final_score: None,
        };

        let path = self.identity.result_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&doc)?;
        std::fs::write(&path, &json)?;
        debug!(path = %path.display(), earned = doc.earned, max = doc.max, "wrote result document");
        Ok(doc)
    }
}
