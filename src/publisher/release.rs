//! Publishing a finished build as a GitHub release and manifest record.

use super::checksum;
use super::config_repo;
use super::description::{self, HashLine};
use super::error::{Error, Result};
use super::github::{GitHubClient, NewRelease};
use super::manifest::{Digest, Manifest, ReleaseInfo, ReleaseRecord};
use crate::builder::BuildResult;
use crate::plugin::{CommitInfo, Plugin};
use crate::settings::Settings;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Publishes build results to the release repository and the manifest.
///
/// # Examples
///
/// ```no_run
/// use kext_builder::publisher::Publisher;
///
/// # async fn example(
/// #     settings: &kext_builder::settings::Settings,
/// #     plugin: &kext_builder::plugin::Plugin,
/// #     commit: &kext_builder::plugin::CommitInfo,
/// #     build: &kext_builder::builder::BuildResult,
/// # ) -> kext_builder::Result<()> {
/// let publisher = Publisher::new(settings, std::env::var("GITHUB_TOKEN").unwrap_or_default())?;
/// let record = publisher.add_built(plugin, commit, build).await?;
/// println!("released {}", record.release.url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Publisher {
    client: GitHubClient,
    manifest_path: PathBuf,
    config_dir: PathBuf,
    target_branch: String,
    deletion_delay: Duration,
}

impl Publisher {
    pub fn new(settings: &Settings, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: GitHubClient::new(settings, token)?,
            manifest_path: settings.manifest_path(),
            config_dir: settings.config_dir(),
            target_branch: settings.target_branch().to_string(),
            deletion_delay: settings.deletion_delay(),
        })
    }

    /// The underlying API client.
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Publishes `build` of `plugin` at `commit` and returns the new record.
    ///
    /// Any release or tag left over from an earlier publish of the same
    /// commit is deleted first. The manifest then holds exactly one record
    /// for the commit, at the front of the plugin's versions. Every artifact
    /// must be a regular file; this is checked before anything remote is
    /// touched. Remote changes made before a later failing step are not
    /// rolled back.
    pub async fn add_built(
        &self,
        plugin: &Plugin,
        commit: &CommitInfo,
        build: &BuildResult,
    ) -> Result<ReleaseRecord> {
        let short = commit.short_sha();
        log::info!("Publishing {} {short}...", plugin.name);

        for path in [&build.debug, &build.release].into_iter().chain(&build.extras) {
            if !path.is_file() {
                return Err(Error::NotAFile(path.clone()));
            }
        }

        let mut manifest = Manifest::load(&self.manifest_path).await?;
        let removed = manifest
            .entry_mut(&plugin.name, &plugin.kind.to_string())
            .remove_commit(&commit.sha);
        if removed > 0 {
            log::info!("\tReplacing {removed} existing record(s) for {short}");
        }

        let mut record = ReleaseRecord::new(commit, &build.version, Utc::now())?;

        let release_name = format!("{} {short}", plugin.name);
        let tag = format!("{}-{short}", plugin.name);
        self.remove_previous(&release_name, &tag).await?;

        log::info!("\tCreating release...");
        let release = self
            .client
            .create_release(&NewRelease {
                tag_name: tag,
                target_commitish: self.target_branch.clone(),
                name: release_name,
            })
            .await?;
        record.release = ReleaseInfo {
            id: release.id,
            url: release.html_url,
            description: String::new(),
        };

        log::info!("\tHashing artifacts...");
        let debug = hash_line(&build.debug).await?;
        let release_line = hash_line(&build.release).await?;
        let mut extras = Vec::with_capacity(build.extras.len());
        for extra in &build.extras {
            extras.push(hash_line(extra).await?);
        }
        record.hashes.insert("debug".into(), Digest { sha256: debug.sha256.clone() });
        record.hashes.insert("release".into(), Digest { sha256: release_line.sha256.clone() });
        for line in &extras {
            record.hashes.insert(line.name.clone(), Digest { sha256: line.sha256.clone() });
        }

        log::info!("\tUploading artifacts...");
        let id = record.release.id;
        for (label, path) in [("debug", &build.debug), ("release", &build.release)] {
            let asset = self.client.upload_asset(id, path).await?;
            record.links.insert(label.to_string(), asset.browser_download_url);
        }
        for (path, line) in build.extras.iter().zip(&extras) {
            let asset = self.client.upload_asset(id, path).await?;
            record.extras.insert(line.name.clone(), asset.browser_download_url);
        }

        let body = description::render(commit, &debug, &release_line, &extras)?;
        self.client.update_release_body(id, &body).await?;
        record.release.description = body;

        manifest
            .entry_mut(&plugin.name, &plugin.kind.to_string())
            .push_front(record.clone());
        manifest.save(&self.manifest_path).await?;
        log::info!("\tManifest updated: {}", self.manifest_path.display());

        config_repo::commit_and_push(&self.config_dir).await;

        Ok(record)
    }

    async fn remove_previous(&self, release_name: &str, tag: &str) -> Result<()> {
        for release in self.client.list_releases().await? {
            if release.name.as_deref() == Some(release_name) {
                log::info!("\tDeleting previous release {}...", release.id);
                self.client.delete_release(release.id).await?;
                tokio::time::sleep(self.deletion_delay).await;
            }
        }

        if self.client.tag_exists(tag).await? {
            log::info!("\tDeleting previous tag {tag}...");
            self.client.delete_tag(tag).await?;
            tokio::time::sleep(self.deletion_delay).await;
        }
        Ok(())
    }
}

async fn hash_line(path: &Path) -> Result<HashLine> {
    Ok(HashLine {
        name: file_name(path),
        sha256: checksum::sha256(path).await?,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
