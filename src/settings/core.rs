//! Core Settings struct and implementations.

use super::PrerequisiteSource;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Default repository receiving releases.
pub const DEFAULT_REPOSITORY: &str = "dhinakg/ktextrepo-beta";
/// Default account used for basic auth.
pub const DEFAULT_ACCOUNT: &str = "dhinakg";
/// Branch new releases are tagged on.
pub const DEFAULT_TARGET_BRANCH: &str = "builds";
/// Wait after each remote deletion.
pub const DEFAULT_DELETION_DELAY: Duration = Duration::from_secs(3);

/// Settings for a build-and-publish run.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), optionally
/// seeded from a settings file.
///
/// # Directory layout
///
/// Everything lives under [`Settings::root_dir`]:
///
/// - `Temp/` scratch checkouts, recreated per run
/// - `Builds/` copied artifacts, recreated per run
/// - `Config/` checkout of the manifest repository, holding `config.json`
#[derive(Clone, Debug)]
pub struct Settings {
    root_dir: PathBuf,
    repository: String,
    account: String,
    target_branch: String,
    api_base: String,
    deletion_delay: Duration,
    prerequisite: PrerequisiteSource,
}

impl Settings {
    /// Root directory of the run.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Scratch workspace for checkouts.
    pub fn work_dir(&self) -> PathBuf {
        self.root_dir.join("Temp")
    }

    /// Output directory for built artifacts.
    pub fn builds_dir(&self) -> PathBuf {
        self.root_dir.join("Builds")
    }

    /// Local checkout of the manifest repository.
    pub fn config_dir(&self) -> PathBuf {
        self.root_dir.join("Config")
    }

    /// The manifest file inside [`Settings::config_dir`].
    pub fn manifest_path(&self) -> PathBuf {
        self.config_dir().join("config.json")
    }

    /// `owner/name` of the repository receiving releases.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Account name for basic auth.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Branch targeted by created releases.
    pub fn target_branch(&self) -> &str {
        &self.target_branch
    }

    /// Base URL of the GitHub REST API, without trailing slash.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Pause after deleting a release or tag.
    pub fn deletion_delay(&self) -> Duration {
        self.deletion_delay
    }

    /// Prerequisite kext source.
    pub fn prerequisite(&self) -> &PrerequisiteSource {
        &self.prerequisite
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        root_dir: PathBuf,
        repository: String,
        account: String,
        target_branch: String,
        api_base: String,
        deletion_delay: Duration,
        prerequisite: PrerequisiteSource,
    ) -> Self {
        Self {
            root_dir,
            repository,
            account,
            target_branch,
            api_base: api_base.trim_end_matches('/').to_string(),
            deletion_delay,
            prerequisite,
        }
    }
}
