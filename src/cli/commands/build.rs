//! The build-and-publish loop.

use crate::builder::{Builder, PrerequisiteCache};
use crate::error::{CliError, Result};
use crate::plugin::Plugin;
use crate::publisher::Publisher;
use crate::settings::Settings;

/// Outcome of a run over several plugins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Plugins built (and published, if publishing)
    pub succeeded: Vec<String>,
    /// Plugins that failed at any step
    pub failed: Vec<String>,
}

impl RunSummary {
    /// Process exit code: 0 when nothing failed.
    pub fn exit_code(&self) -> i32 {
        if self.failed.is_empty() { 0 } else { 1 }
    }
}

/// Builds each plugin in order and publishes it when `publisher` is given.
///
/// A failing plugin is logged and skipped; the remaining plugins still run.
pub async fn build_all(
    settings: &Settings,
    plugins: &[Plugin],
    commit: Option<&str>,
    publisher: Option<&Publisher>,
) -> Result<RunSummary> {
    let builder = Builder::new(settings).await?;
    let mut prerequisite = PrerequisiteCache::new(settings.prerequisite().clone());
    let mut summary = RunSummary::default();

    for plugin in plugins {
        match build_one(&builder, plugin, commit, &mut prerequisite, publisher).await {
            Ok(()) => summary.succeeded.push(plugin.name.clone()),
            Err(e) => {
                log::error!("{} failed: {e}", plugin.name);
                if let Some(output) = e.captured_output() {
                    log::error!("{output}");
                }
                summary.failed.push(plugin.name.clone());
            }
        }
    }

    log::info!(
        "Done: {} succeeded, {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    );
    if !summary.failed.is_empty() {
        log::warn!("Failed: {}", summary.failed.join(", "));
    }
    Ok(summary)
}

async fn build_one(
    builder: &Builder,
    plugin: &Plugin,
    commit: Option<&str>,
    prerequisite: &mut PrerequisiteCache,
    publisher: Option<&Publisher>,
) -> Result<()> {
    let result = builder.build(plugin, commit, prerequisite).await?;
    log::info!(
        "{} {} built at {}",
        plugin.name,
        result.version,
        result.release.display()
    );

    let Some(publisher) = publisher else {
        return Ok(());
    };

    let (owner, repo) = plugin.github_slug().ok_or_else(|| CliError::ExecutionFailed {
        command: "get commit".to_string(),
        reason: format!("{} is not a GitHub repository URL", plugin.url),
    })?;
    let info = publisher.client().get_commit(&owner, &repo, &result.commit).await?;
    publisher.add_built(plugin, &info, &result).await?;
    Ok(())
}
