//! Main build orchestration.
//!
//! This module provides the [`Builder`] that turns a plugin descriptor into
//! artifacts on local disk.

use super::{
    artifacts,
    error::Result,
    plan::BuildPlan,
    prerequisite::PrerequisiteCache,
    source, tool_detection,
    version::resolve_version,
    workspace::Workspace,
};
use crate::plugin::{Plugin, Task};
use crate::process;
use crate::settings::Settings;
use std::path::{Path, PathBuf};

/// Output of one plugin build, consumed by the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Debug artifact in the output layout
    pub debug: PathBuf,
    /// Release artifact in the output layout
    pub release: PathBuf,
    /// Extra files in the output layout
    pub extras: Vec<PathBuf>,
    /// Resolved version string
    pub version: String,
    /// Commit hash that was built
    pub commit: String,
}

/// Builds plugins one at a time inside a shared workspace.
///
/// Construction resets the workspace, so a run must own its root directory
/// exclusively.
///
/// # Examples
///
/// ```no_run
/// use kext_builder::builder::{Builder, PrerequisiteCache};
/// use kext_builder::settings::SettingsBuilder;
///
/// # async fn example(plugins: Vec<kext_builder::plugin::Plugin>) -> kext_builder::Result<()> {
/// let settings = SettingsBuilder::new().root_dir(".").build()?;
/// let builder = Builder::new(&settings).await?;
/// let mut cache = PrerequisiteCache::new(settings.prerequisite().clone());
///
/// for plugin in &plugins {
///     let result = builder.build(plugin, None, &mut cache).await?;
///     println!("{} {} -> {}", plugin.name, result.version, result.release.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder {
    workspace: Workspace,
}

impl Builder {
    /// Creates a builder, recreating `Temp/` and `Builds/` under the root.
    pub async fn new(settings: &Settings) -> Result<Self> {
        tool_detection::report_missing_tools();
        let workspace = Workspace::prepare(settings.work_dir(), settings.builds_dir()).await?;
        Ok(Self { workspace })
    }

    /// The workspace this builder writes to.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Builds `plugin`, optionally at a specific `commit`.
    ///
    /// The checkout under `Temp/` is removed when this returns, whether the
    /// build succeeded or not.
    pub async fn build(
        &self,
        plugin: &Plugin,
        commit: Option<&str>,
        prerequisite: &mut PrerequisiteCache,
    ) -> Result<BuildResult> {
        let plan = BuildPlan::for_plugin(plugin);

        log::info!("Building {}...", plugin.name);
        let checkout = self.workspace.checkout_dir(&plugin.name).await?;
        let dir = checkout.path();

        log::info!("\tCloning the repo...");
        source::clone_repo(&plugin.clone_url(), dir).await?;
        let commit = source::resolve_commit(dir, commit).await?;

        if plugin.lilu {
            prerequisite.install_into(&self.workspace, dir).await?;
        }

        run_tasks("prebuild", &plan.pre_build, dir).await?;
        self.run_build(plugin, &plan, dir).await?;
        run_tasks("postbuild", &plan.post_build, dir).await?;

        let version = resolve_version(plugin, dir, &plan.build_dir).await?;
        log::info!("\tVersion: {version}");

        log::info!("\tCopying to build directory...");
        let resolved = artifacts::resolve(plugin, dir)?;
        let target = artifacts::commit_dir(self.workspace.output(), plugin, &commit);
        let copied = artifacts::copy_to_output(&resolved, &target).await?;

        Ok(BuildResult {
            debug: copied.debug,
            release: copied.release,
            extras: copied.extras,
            version,
            commit,
        })
    }

    async fn run_build(&self, plugin: &Plugin, plan: &BuildPlan, dir: &Path) -> Result<()> {
        if let Some(command) = &plugin.command {
            log::info!("\tBuilding...");
            process::run_argv("build", &command.argv(), dir).await?;
            return Ok(());
        }

        for configuration in ["Release", "Debug"] {
            log::info!("\tBuilding {} version...", configuration.to_lowercase());
            let args = xcodebuild_args(configuration, &plan.build_opts);
            process::run(&format!("xcodebuild {configuration}"), "xcodebuild", &args, dir).await?;
        }
        Ok(())
    }
}

/// Arguments for one default xcodebuild invocation.
pub fn xcodebuild_args(configuration: &str, build_opts: &[String]) -> Vec<String> {
    let mut args: Vec<String> = ["-quiet", "-configuration", configuration]
        .map(String::from)
        .to_vec();
    args.extend(build_opts.iter().cloned());
    args.push("BUILD_DIR=build/".to_string());
    args
}

async fn run_tasks(stage: &str, tasks: &[Task], dir: &Path) -> Result<()> {
    if tasks.is_empty() {
        return Ok(());
    }
    log::info!("\tRunning {stage} tasks...");
    for task in tasks {
        log::info!("\t\tRunning task '{}'", task.name);
        process::run(&format!("{stage} task '{}'", task.name), &task.path, &task.args, dir).await?;
        log::info!("\t\tTask completed.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xcodebuild_args_append_opts_then_build_dir() {
        let args = xcodebuild_args("Debug", &["-target".into(), "Foo".into()]);
        assert_eq!(
            args,
            vec!["-quiet", "-configuration", "Debug", "-target", "Foo", "BUILD_DIR=build/"]
        );
    }
}
