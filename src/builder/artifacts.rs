//! Artifact discovery and copying into the output layout.
//!
//! Patterns are resolved against the plugin checkout. Output lands in
//! `{output}/{Category}/{Name}/{commit}/{Debug,Release}/`.

use super::error::{Error, Result};
use super::fs;
use super::workspace::ScopedDir;
use crate::plugin::Plugin;
use std::path::{Path, PathBuf};

/// Artifacts located in a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifacts {
    /// First match of the debug pattern
    pub debug: PathBuf,
    /// First match of the release pattern
    pub release: PathBuf,
    /// All matches of every extras pattern, in pattern order
    pub extras: Vec<PathBuf>,
}

/// Artifacts after copying into the output layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedArtifacts {
    /// Debug artifact in `.../Debug/`
    pub debug: PathBuf,
    /// Release artifact in `.../Release/`
    pub release: PathBuf,
    /// Extras in `.../Debug/` (copies also exist in `.../Release/`)
    pub extras: Vec<PathBuf>,
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expands `pattern` against `root`.
///
/// Patterns without glob metacharacters are literal paths and match only if
/// they exist. Matches are returned in sorted order.
pub fn expand(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let joined = root.join(pattern);
    if !has_glob_meta(pattern) {
        return Ok(if joined.exists() { vec![joined] } else { Vec::new() });
    }

    let escaped_root = glob::Pattern::escape(&root.to_string_lossy());
    let full = Path::new(&escaped_root).join(pattern).to_string_lossy().into_owned();
    let paths = glob::glob(&full).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut matches = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => log::warn!("Skipping unreadable match for {pattern}: {e}"),
        }
    }
    matches.sort();
    Ok(matches)
}

/// First match of `pattern`, failing when there is none.
pub fn expand_first(root: &Path, pattern: &str) -> Result<PathBuf> {
    expand(root, pattern)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoMatches {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
        })
}

/// Locates the debug, release and extra artifacts of `plugin` in `checkout`.
pub fn resolve(plugin: &Plugin, checkout: &Path) -> Result<ResolvedArtifacts> {
    let debug = expand_first(checkout, &plugin.debug_file)?;
    let release = expand_first(checkout, &plugin.release_file)?;

    let mut extras = Vec::new();
    for pattern in &plugin.extras {
        let found = expand(checkout, pattern)?;
        if found.is_empty() {
            log::warn!("\tExtras pattern `{pattern}` matched nothing; skipping");
        }
        extras.extend(found);
    }

    Ok(ResolvedArtifacts {
        debug,
        release,
        extras,
    })
}

/// Output directory for one commit of one plugin.
pub fn commit_dir(output: &Path, plugin: &Plugin, commit: &str) -> PathBuf {
    output
        .join(plugin.kind.category())
        .join(&plugin.name)
        .join(commit)
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr> {
    path.file_name()
        .ok_or_else(|| Error::GenericError(format!("{} has no file name", path.display())))
}

/// Copies resolved artifacts into the output layout.
///
/// `Debug/` and `Release/` are recreated fresh. Extras go into both. If any
/// copy fails the commit directory is removed again.
pub async fn copy_to_output(
    resolved: &ResolvedArtifacts,
    commit_dir: &Path,
) -> Result<CopiedArtifacts> {
    let guard = ScopedDir::new(commit_dir.to_path_buf());
    let debug_dir = commit_dir.join("Debug");
    let release_dir = commit_dir.join("Release");
    for dir in [&debug_dir, &release_dir] {
        fs::create_dir_all(dir, true).await?;
    }

    let mut extras = Vec::with_capacity(resolved.extras.len());
    for extra in &resolved.extras {
        if !extra.is_file() && !extra.is_dir() {
            log::warn!("{} is not a file or a directory; skipping", extra.display());
            continue;
        }
        let name = file_name(extra)?;
        fs::copy_artifact(extra, &debug_dir.join(name)).await?;
        fs::copy_artifact(extra, &release_dir.join(name)).await?;
        extras.push(debug_dir.join(name));
    }

    let debug = debug_dir.join(file_name(&resolved.debug)?);
    fs::copy_artifact(&resolved.debug, &debug).await?;

    let release = release_dir.join(file_name(&resolved.release)?);
    fs::copy_artifact(&resolved.release, &release).await?;

    guard.persist();
    Ok(CopiedArtifacts {
        debug,
        release,
        extras,
    })
}
