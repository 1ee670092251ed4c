//! Optional TOML settings file.
//!
//! ```toml
//! root = "/srv/kexts"
//!
//! [publish]
//! repository = "acme/kext-releases"
//! account = "acme-bot"
//! branch = "builds"
//! deletion_delay_secs = 3
//!
//! [prerequisite]
//! name = "Lilu"
//! url = "https://github.com/acidanthera/Lilu"
//! artifact = "build/Debug/Lilu.kext"
//! ```
//!
//! Every key is optional; values set here are overridden by CLI flags.

use super::{PrerequisiteSource, SettingsBuilder};
use crate::error::{CliError, Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parsed settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    /// Root directory; relative paths resolve against the file's directory
    pub root: Option<PathBuf>,
    /// Release publishing options
    #[serde(default)]
    pub publish: PublishSection,
    /// Prerequisite override
    pub prerequisite: Option<PrerequisiteSource>,
}

/// `[publish]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishSection {
    /// `owner/name` of the release repository
    pub repository: Option<String>,
    /// Basic-auth account
    pub account: Option<String>,
    /// Target branch for releases
    pub branch: Option<String>,
    /// GitHub API base URL
    pub api_base: Option<String>,
    /// Seconds to wait after each remote deletion
    pub deletion_delay_secs: Option<u64>,
}

impl SettingsFile {
    /// Parses settings from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a settings file, resolving a relative `root`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Cli(CliError::ExecutionFailed {
                command: "read settings file".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            })
        })?;
        let mut file = Self::parse(&text)?;
        if let (Some(root), Some(base)) = (file.root.as_ref(), path.parent()) {
            if root.is_relative() {
                file.root = Some(base.join(root));
            }
        }
        log::debug!("Loaded settings from {}", path.display());
        Ok(file)
    }

    /// Seeds a builder with every value present in the file.
    pub fn apply(self, mut builder: SettingsBuilder) -> SettingsBuilder {
        if let Some(root) = self.root {
            builder = builder.root_dir(root);
        }
        let publish = self.publish;
        if let Some(repository) = publish.repository {
            builder = builder.repository(repository);
        }
        if let Some(account) = publish.account {
            builder = builder.account(account);
        }
        if let Some(branch) = publish.branch {
            builder = builder.target_branch(branch);
        }
        if let Some(api_base) = publish.api_base {
            builder = builder.api_base(api_base);
        }
        if let Some(secs) = publish.deletion_delay_secs {
            builder = builder.deletion_delay(Duration::from_secs(secs));
        }
        if let Some(prerequisite) = self.prerequisite {
            builder = builder.prerequisite(prerequisite);
        }
        builder
    }
}
