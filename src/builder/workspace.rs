//! Scratch and output directory provisioning.

use super::error::Result;
use super::fs;
use std::path::{Path, PathBuf};

/// The scratch (`Temp`) and output (`Builds`) directories of one run.
#[derive(Debug, Clone)]
pub struct Workspace {
    scratch: PathBuf,
    output: PathBuf,
}

impl Workspace {
    /// Recreates both directories, discarding any previous build state.
    pub async fn prepare(scratch: PathBuf, output: PathBuf) -> Result<Self> {
        fs::create_dir_all(&scratch, true).await?;
        fs::create_dir_all(&output, true).await?;
        log::debug!(
            "Workspace ready: scratch={} output={}",
            scratch.display(),
            output.display()
        );
        Ok(Self { scratch, output })
    }

    /// Scratch root holding checkouts and the cached prerequisite.
    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    /// Output root for copied artifacts.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Fresh, scoped checkout directory for `name`.
    ///
    /// Anything left at the path is removed first; the directory itself is
    /// removed again when the returned guard drops.
    pub async fn checkout_dir(&self, name: &str) -> Result<ScopedDir> {
        let path = self.scratch.join(name);
        fs::remove_dir_all(&path).await?;
        Ok(ScopedDir::new(path))
    }
}

/// Directory removed on drop unless [`ScopedDir::persist`] is called.
#[derive(Debug)]
pub struct ScopedDir {
    path: PathBuf,
    keep: bool,
}

impl ScopedDir {
    /// Guards `path`. The directory need not exist yet.
    pub fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    /// The guarded path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps the directory and returns its path.
    pub fn persist(mut self) -> PathBuf {
        self.keep = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => log::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
