//! Repository slug resolution from the local git remote.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context};

/// Read `remote.origin.url` from the repository at `dir` and parse it into
/// an `owner/repo` slug.
pub fn detect_repo(dir: &Path) -> anyhow::Result<String> {
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .current_dir(dir)
        .output()
        .context("failed to run git")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git config --get remote.origin.url failed: {stderr}");
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_remote_url(&url)
}

/// Parse an `owner/repo` slug out of a git remote URL.
///
/// Supports the two common remote shapes:
/// - SSH: `git@host:owner/repo.git`
/// - HTTPS: `https://host/owner/repo.git`
///
/// Anything else is a configuration error.
pub fn parse_remote_url(url: &str) -> anyhow::Result<String> {
    let path = if let Some(rest) = url.strip_prefix("git@") {
        match rest.split_once(':') {
            Some((_host, path)) => path,
            None => bail!("unrecognized SSH remote URL: {url}"),
        }
    } else if let Some((_scheme, rest)) = url.split_once("://") {
        match rest.split_once('/') {
            Some((_host, path)) => path,
            None => bail!("remote URL has no repository path: {url}"),
        }
    } else {
        bail!("remote URL is neither SSH nor HTTPS form: {url}");
    };

    let trimmed = path.trim_end_matches('/');
    let slug = trimmed.strip_suffix(".git").unwrap_or(trimmed).to_string();
    if slug.is_empty() || !slug.contains('/') {
        bail!("remote URL has no owner/repo slug: {url}");
    }
    Ok(slug)
}
