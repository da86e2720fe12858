//! In-memory fake provider (testing only)
//!
//! [`FakeProvider`] satisfies the [`CiProvider`] contract without the `gh`
//! CLI: runs are preset, and artifacts are written to the destination
//! directory from an in-memory file map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{ArtifactFetch, CiProvider};
use crate::run::{RunConclusion, RunRecord};

/// In-memory CI provider for tests.
#[derive(Debug, Default)]
pub struct FakeProvider {
    runs: Mutex<Vec<RunRecord>>,
    // run_id -> [(relative path, contents)]
    artifacts: Mutex<HashMap<String, Vec<(PathBuf, String)>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run to the listing, in listing order.
    pub fn push_run(&self, run_id: &str, conclusion: RunConclusion) {
        self.runs
            .lock()
            .unwrap()
            .push(RunRecord::new(run_id, conclusion));
    }

    /// Add a file to the artifact bundle of `run_id`.
    pub fn put_artifact_file(&self, run_id: &str, rel_path: &str, contents: &str) {
        self.artifacts
            .lock()
            .unwrap()
            .entry(run_id.to_string())
            .or_default()
            .push((PathBuf::from(rel_path), contents.to_string()));
    }
}

#[async_trait]
impl CiProvider for FakeProvider {
    async fn list_runs(
        &self,
        _repo: &str,
        _workflow: &str,
        limit: u32,
    ) -> anyhow::Result<Vec<RunRecord>> {
        let runs = self.runs.lock().unwrap();
        Ok(runs.iter().take(limit as usize).cloned().collect())
    }

    async fn download_artifact(
        &self,
        run_id: &str,
        _repo: &str,
        _artifact: &str,
        dest: &Path,
    ) -> anyhow::Result<ArtifactFetch> {
        let artifacts = self.artifacts.lock().unwrap();
        let Some(files) = artifacts.get(run_id) else {
            return Ok(ArtifactFetch::NotFound);
        };
        for (rel_path, contents) in files {
            let path = dest.join(rel_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, contents)?;
        }
        Ok(ArtifactFetch::Fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_respects_limit() {
        let provider = FakeProvider::new();
        provider.push_run("1", RunConclusion::Success);
        provider.push_run("2", RunConclusion::Success);
        provider.push_run("3", RunConclusion::Failure);

        let runs = provider.list_runs("o/r", "Autograde", 2).await.unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].run_id, "1");
    }

    #[tokio::test]
    async fn test_download_writes_files_or_reports_not_found() {
        let provider = FakeProvider::new();
        provider.put_artifact_file("1", "inner/result.txt", "data");

        let dir = tempfile::tempdir().unwrap();
        let fetch = provider
            .download_artifact("1", "o/r", "autograder_result", dir.path())
            .await
            .unwrap();
        assert_eq!(fetch, ArtifactFetch::Fetched);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("inner/result.txt")).unwrap(),
            "data"
        );

        let miss = provider
            .download_artifact("2", "o/r", "autograder_result", dir.path())
            .await
            .unwrap();
        assert_eq!(miss, ArtifactFetch::NotFound);
    }
}
