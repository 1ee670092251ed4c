//! Pushes manifest changes from the `Config` checkout.

use crate::process::{self, CommandError};
use std::path::Path;

const COMMIT_MESSAGE: &str = "Deploying to builds";

/// Commits all tracked changes in `config_dir` and pushes them.
///
/// Failures are logged with the captured output and not returned; the
/// manifest on disk is already up to date at this point.
pub async fn commit_and_push(config_dir: &Path) {
    if let Err(e) = try_commit_and_push(config_dir).await {
        log::error!("Updating {} failed: {e}", config_dir.display());
        if let Some(output) = e.captured_output() {
            log::error!("{output}");
        }
    }
}

async fn try_commit_and_push(config_dir: &Path) -> Result<(), CommandError> {
    log::info!("\tCommitting manifest...");
    process::run("commit", "git", ["commit", "-am", COMMIT_MESSAGE], config_dir).await?;
    log::info!("\tPushing manifest...");
    process::run("push", "git", ["push"], config_dir).await?;
    Ok(())
}
