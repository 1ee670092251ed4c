//! File system helpers for workspace provisioning and artifact copying.
//!
//! Directory creation and removal are idempotent; copies create missing
//! destination parents and preserve symlinks inside copied bundles.

use super::error::{Error, ErrorExt, Result};
use crate::bail;
use std::{io, path::Path};
use tokio::fs;

/// Creates all directories of `path`, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "removing directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Copies a regular file, creating the destination's parent directories.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.is_file() {
        bail!("{} is not a file", from.display());
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory, creating the destination's parents.
///
/// Preserves symlinks. Fails if the source is not a directory.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        bail!("{} is not a directory", from.display());
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || copy_tree(&from, &to))
        .await
        .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {e}")))?
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry.map_err(|e| Error::GenericError(format!("walking {}: {e}", from.display())))?;
        let rel_path = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| Error::GenericError(e.to_string()))?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
            symlink(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, dst)
}

#[cfg(windows)]
fn symlink(target: &Path, dst: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, dst)
    } else {
        std::os::windows::fs::symlink_file(target, dst)
    }
}

/// Copies a file or directory to `to`, warning when it is a directory.
pub async fn copy_artifact(from: &Path, to: &Path) -> Result<()> {
    if from.is_dir() {
        log::warn!("{} is a directory; copying the whole tree", from.display());
        copy_dir(from, to).await
    } else {
        copy_file(from, to).await
    }
}
