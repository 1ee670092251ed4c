//! Plugin descriptors and the plugins file.
//!
//! A plugins file is JSON holding either a bare array of descriptors or an
//! object with a `Plugins` array. Descriptors keep the key names used by the
//! existing kext repository tooling (`"Name"`, `"Build Opts"`, ...).

mod commit;
mod descriptor;

pub use commit::{CommitDetails, CommitInfo, Signature, short_sha};
pub use descriptor::{CommandSpec, Plugin, PluginType, Task};

use crate::error::{CliError, Error, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum PluginsFile {
    Wrapped {
        #[serde(rename = "Plugins")]
        plugins: Vec<Plugin>,
    },
    Bare(Vec<Plugin>),
}

/// Parses plugin descriptors from JSON text.
pub fn parse_plugins(json: &str) -> Result<Vec<Plugin>> {
    let file: PluginsFile = serde_json::from_str(json)?;
    Ok(match file {
        PluginsFile::Wrapped { plugins } | PluginsFile::Bare(plugins) => plugins,
    })
}

/// Reads and parses a plugins file.
pub async fn load_plugins(path: &Path) -> Result<Vec<Plugin>> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::Cli(CliError::ExecutionFailed {
            command: "read plugins file".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;
    let plugins = parse_plugins(&text)?;
    log::debug!("Loaded {} plugin(s) from {}", plugins.len(), path.display());
    Ok(plugins)
}

/// Restricts `plugins` to the names in `only`, keeping file order.
///
/// An empty filter keeps everything. Unknown names are an error.
pub fn select(plugins: Vec<Plugin>, only: &[String]) -> Result<Vec<Plugin>> {
    if only.is_empty() {
        return Ok(plugins);
    }
    if let Some(missing) = only.iter().find(|n| !plugins.iter().any(|p| &p.name == *n)) {
        return Err(Error::Cli(CliError::InvalidArguments {
            reason: format!("No plugin named '{missing}' in plugins file"),
        }));
    }
    Ok(plugins.into_iter().filter(|p| only.contains(&p.name)).collect())
}
