//! Command line argument parsing and validation.

use crate::error::{CliError, Result};
use crate::settings::{Settings, SettingsBuilder, SettingsFile};
use clap::Parser;
use std::path::PathBuf;

/// Build kexts from source and publish them as GitHub releases
#[derive(Parser, Debug)]
#[command(
    name = "kext_builder",
    version,
    about = "Build kexts from source and publish them as GitHub releases",
    long_about = "Clones each plugin listed in the plugins file, builds it with xcodebuild (or the
plugin's own command), copies the artifacts to Builds/{Category}/{Name}/{commit}/ and,
unless --no-publish is given, publishes them as a release and records the release in
Config/config.json.

Usage:
  kext_builder --plugins plugins.json
  kext_builder --plugins plugins.json --only Lilu --only WhateverGreen
  kext_builder --plugins plugins.json --only Lilu --commit 1a2b3c4
  kext_builder --plugins plugins.json --no-publish --root /tmp/kexts

Exit code 0 = every selected plugin was built (and published)."
)]
pub struct Args {
    /// Plugins file (JSON array or {\"Plugins\": [...]})
    #[arg(short, long, value_name = "FILE")]
    pub plugins: PathBuf,

    /// Only process the named plugin (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,

    /// Build this commit instead of HEAD (requires exactly one --only)
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Root directory holding Temp/, Builds/ and Config/
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// GitHub token for the release repository
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Build only; skip releases and the manifest
    #[arg(long)]
    pub no_publish: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.commit.is_some() && self.only.len() != 1 {
            return Err(format!(
                "--commit requires exactly one --only plugin, got {}",
                self.only.len()
            ));
        }
        if self.only.iter().any(|name| name.trim().is_empty()) {
            return Err("--only cannot be empty".to_string());
        }
        Ok(())
    }

    /// The token, required unless `--no-publish` is set.
    pub fn publish_token(&self) -> Result<Option<&str>> {
        if self.no_publish {
            return Ok(None);
        }
        match self.token.as_deref() {
            Some(token) if !token.is_empty() => Ok(Some(token)),
            _ => Err(CliError::MissingArgument {
                argument: "--token (or GITHUB_TOKEN)".to_string(),
            }
            .into()),
        }
    }

    /// Settings from the settings file (if any), then `--root`.
    ///
    /// Without either, the current directory is the root.
    pub fn to_settings(&self) -> Result<Settings> {
        let mut builder = SettingsBuilder::new().root_dir(".");
        if let Some(path) = &self.settings {
            builder = SettingsFile::load(path)?.apply(builder);
        }
        if let Some(root) = &self.root {
            builder = builder.root_dir(root);
        }
        builder.build()
    }
}
