//! The persisted build manifest (`Config/config.json`).
//!
//! Maps each plugin name to its type and its published versions, newest
//! first. Records written by other tools may carry fields this crate does not
//! know about; those are kept verbatim when the file is rewritten.

use super::error::{Error, ErrorExt, Result};
use crate::plugin::CommitInfo;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Value of [`ReleaseRecord::source`] for records produced by this tool.
pub const SOURCE_BUILT: &str = "built";

/// Commit a record was built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCommit {
    pub sha: String,
    pub message: String,
}

/// The hosted release backing a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// One digest entry under `hashes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    pub sha256: String,
}

/// One published version of a plugin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub commit: RecordCommit,
    pub version: String,
    pub dateadded: DateTime<FixedOffset>,
    pub datecommitted: DateTime<FixedOffset>,
    pub source: String,
    pub release: ReleaseInfo,
    #[serde(default)]
    pub hashes: BTreeMap<String, Digest>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ReleaseRecord {
    /// Starts a record for `commit`, stamped with `added` as the publish time.
    ///
    /// The release, hashes and links are filled in as publishing proceeds.
    pub fn new(commit: &CommitInfo, version: &str, added: DateTime<Utc>) -> Result<Self> {
        let date = &commit.commit.committer.date;
        let datecommitted = DateTime::parse_from_rfc3339(date).map_err(|source| Error::CommitDate {
            date: date.clone(),
            source,
        })?;

        Ok(Self {
            commit: RecordCommit {
                sha: commit.sha.clone(),
                message: commit.commit.message.clone(),
            },
            version: version.to_string(),
            dateadded: added.fixed_offset(),
            datecommitted,
            source: SOURCE_BUILT.to_string(),
            release: ReleaseInfo {
                id: 0,
                url: String::new(),
                description: String::new(),
            },
            hashes: BTreeMap::new(),
            links: BTreeMap::new(),
            extras: BTreeMap::new(),
            other: Map::new(),
        })
    }
}

/// A plugin's entry in the manifest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub versions: Vec<ReleaseRecord>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl PluginEntry {
    /// Drops every record built from `sha`, returning how many were removed.
    pub fn remove_commit(&mut self, sha: &str) -> usize {
        let before = self.versions.len();
        self.versions.retain(|record| record.commit.sha != sha);
        before - self.versions.len()
    }

    /// Makes `record` the newest version.
    pub fn push_front(&mut self, record: ReleaseRecord) {
        self.versions.insert(0, record);
    }
}

/// Plugin name to [`PluginEntry`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    plugins: BTreeMap<String, PluginEntry>,
}

impl Manifest {
    /// Parses manifest JSON; blank input is an empty manifest.
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Reads the manifest at `path`; a missing file is an empty manifest.
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(Error::Fs {
                context: "reading manifest".to_string(),
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Pretty JSON with sorted keys and 2-space indentation.
    pub fn to_json(&self) -> Result<String> {
        let value = serde_json::to_value(self)?;
        let mut text = serde_json::to_string_pretty(&value)?;
        text.push('\n');
        Ok(text)
    }

    /// Rewrites the manifest at `path` in full.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating directory", parent)?;
        }
        tokio::fs::write(path, self.to_json()?)
            .await
            .fs_context("writing manifest", path)
    }

    /// Looks up a plugin's entry.
    pub fn get(&self, name: &str) -> Option<&PluginEntry> {
        self.plugins.get(name)
    }

    /// The entry for `name`, created if missing; an empty type is set to `kind`.
    pub fn entry_mut(&mut self, name: &str, kind: &str) -> &mut PluginEntry {
        let entry = self.plugins.entry(name.to_string()).or_default();
        if entry.kind.is_empty() {
            entry.kind = kind.to_string();
        }
        entry
    }

    /// Number of plugins recorded.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is recorded.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
