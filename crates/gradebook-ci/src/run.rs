//! Workflow run records as seen by the run lister.

use serde::Deserialize;

/// Terminal conclusion of a CI run.
///
/// Anything the provider reports that is not a clean success or failure
/// (cancelled, skipped, still running, missing) collapses to [`Other`];
/// the pipeline only ever acts on [`Success`].
///
/// [`Other`]: RunConclusion::Other
/// [`Success`]: RunConclusion::Success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunConclusion {
    Success,
    Failure,
    Other,
}

impl RunConclusion {
    pub(crate) fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("success") => RunConclusion::Success,
            Some("failure") => RunConclusion::Failure,
            _ => RunConclusion::Other,
        }
    }
}

/// One CI execution as enumerated by the provider. Ephemeral; fetched fresh
/// each invocation and never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// Opaque run identifier, unique per execution.
    pub run_id: String,

    /// Terminal conclusion.
    pub conclusion: RunConclusion,
}

impl RunRecord {
    pub fn new(run_id: impl Into<String>, conclusion: RunConclusion) -> Self {
        Self {
            run_id: run_id.into(),
            conclusion,
        }
    }
}

/// Wire shape of `gh run list --json databaseId,conclusion`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireRun {
    #[serde(rename = "databaseId")]
    pub database_id: u64,

    #[serde(default)]
    pub conclusion: Option<String>,
}

impl From<WireRun> for RunRecord {
    fn from(wire: WireRun) -> Self {
        RunRecord {
            run_id: wire.database_id.to_string(),
            conclusion: RunConclusion::from_wire(wire.conclusion.as_deref()),
        }
    }
}
