//! Source checkout via the `git` CLI.

use super::error::Result;
use crate::process;
use std::ffi::OsStr;
use std::path::Path;

/// Clones `url` into `dest`.
pub async fn clone_repo(url: &str, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or(Path::new("."));
    let args = [OsStr::new("clone"), OsStr::new(url), dest.as_os_str()];
    process::run("clone", "git", args, parent).await?;
    Ok(())
}

/// Checks out `commit` in `repo`.
pub async fn checkout(repo: &Path, commit: &str) -> Result<()> {
    process::run("checkout", "git", ["checkout", commit], repo).await?;
    Ok(())
}

/// Full hash of `HEAD` in `repo`.
pub async fn head_commit(repo: &Path) -> Result<String> {
    let output = process::run("rev-parse", "git", ["rev-parse", "HEAD"], repo).await?;
    Ok(process::stdout_trimmed(&output))
}

/// Checks out `commit` when given, then returns the hash actually at `HEAD`.
pub async fn resolve_commit(repo: &Path, commit: Option<&str>) -> Result<String> {
    if let Some(commit) = commit {
        log::info!("\tChecking out {commit}...");
        checkout(repo, commit).await?;
    }
    head_commit(repo).await
}
