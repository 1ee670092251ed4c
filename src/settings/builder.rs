//! Builder for constructing Settings.

use super::core::{
    DEFAULT_ACCOUNT, DEFAULT_API_BASE, DEFAULT_DELETION_DELAY, DEFAULT_REPOSITORY,
    DEFAULT_TARGET_BRANCH,
};
use super::{PrerequisiteSource, Settings};
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use kext_builder::settings::SettingsBuilder;
/// use std::time::Duration;
///
/// # fn example() -> kext_builder::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root_dir("/srv/kexts")
///     .repository("acme/kext-releases")
///     .deletion_delay(Duration::from_secs(5))
///     .build()?;
/// assert_eq!(settings.target_branch(), "builds");
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct SettingsBuilder {
    root_dir: Option<PathBuf>,
    repository: Option<String>,
    account: Option<String>,
    target_branch: Option<String>,
    api_base: Option<String>,
    deletion_delay: Option<Duration>,
    prerequisite: Option<PrerequisiteSource>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the root directory holding `Temp`, `Builds` and `Config`.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn root_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the `owner/name` repository receiving releases.
    ///
    /// Default: `dhinakg/ktextrepo-beta`
    pub fn repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Sets the basic-auth account name.
    ///
    /// Default: `dhinakg`
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the branch new releases target.
    ///
    /// Default: `builds`
    pub fn target_branch(mut self, branch: impl Into<String>) -> Self {
        self.target_branch = Some(branch.into());
        self
    }

    /// Sets the GitHub API base URL.
    ///
    /// Default: `https://api.github.com`
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = Some(url.into());
        self
    }

    /// Sets the pause after each remote deletion.
    ///
    /// Default: 3 seconds
    pub fn deletion_delay(mut self, delay: Duration) -> Self {
        self.deletion_delay = Some(delay);
        self
    }

    /// Sets the prerequisite kext source.
    ///
    /// Default: [`PrerequisiteSource::default`] (Lilu)
    pub fn prerequisite(mut self, source: PrerequisiteSource) -> Self {
        self.prerequisite = Some(source);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `root_dir` is missing or `repository` is not of
    /// the form `owner/name`.
    pub fn build(self) -> Result<Settings> {
        let root_dir = self.root_dir.ok_or_else(|| CliError::MissingArgument {
            argument: "root_dir".to_string(),
        })?;

        let repository = self
            .repository
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        let valid = repository
            .split_once('/')
            .is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'));
        if !valid {
            return Err(CliError::InvalidArguments {
                reason: format!("repository must be 'owner/name', got '{repository}'"),
            }
            .into());
        }

        Ok(Settings::new(
            root_dir,
            repository,
            self.account.unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            self.target_branch
                .unwrap_or_else(|| DEFAULT_TARGET_BRANCH.to_string()),
            self.api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            self.deletion_delay.unwrap_or(DEFAULT_DELETION_DELAY),
            self.prerequisite.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_layout() {
        let settings = SettingsBuilder::new().root_dir("/work").build().unwrap();
        assert_eq!(settings.repository(), "dhinakg/ktextrepo-beta");
        assert_eq!(settings.account(), "dhinakg");
        assert_eq!(settings.target_branch(), "builds");
        assert_eq!(settings.api_base(), "https://api.github.com");
        assert_eq!(settings.deletion_delay(), Duration::from_secs(3));
        assert_eq!(settings.work_dir(), PathBuf::from("/work/Temp"));
        assert_eq!(settings.builds_dir(), PathBuf::from("/work/Builds"));
        assert_eq!(settings.manifest_path(), PathBuf::from("/work/Config/config.json"));
        assert_eq!(settings.prerequisite().name, "Lilu");
    }

    #[test]
    fn root_dir_is_required() {
        let err = SettingsBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("root_dir"));
    }

    #[test]
    fn repository_must_be_a_slug() {
        let err = SettingsBuilder::new()
            .root_dir("/work")
            .repository("just-a-name")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("owner/name"));
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let settings = SettingsBuilder::new()
            .root_dir("/work")
            .api_base("http://127.0.0.1:1234/")
            .build()
            .unwrap();
        assert_eq!(settings.api_base(), "http://127.0.0.1:1234");
    }
}
