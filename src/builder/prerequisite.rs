//! Shared prerequisite kext, built once per run.

use super::error::Result;
use super::{fs, source, workspace::Workspace};
use crate::bail;
use crate::process;
use crate::settings::PrerequisiteSource;
use std::path::{Path, PathBuf};

/// A built prerequisite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrerequisite {
    /// Commit the prerequisite was built from
    pub commit: String,
    /// Cached bundle under the scratch root
    pub path: PathBuf,
}

/// Caller-owned cache of the prerequisite build.
///
/// Pass the same cache to every [`Builder::build`](super::Builder::build)
/// call of a run; the first plugin that needs the prerequisite builds it and
/// later ones reuse the cached bundle.
#[derive(Debug)]
pub struct PrerequisiteCache {
    source: PrerequisiteSource,
    built: Option<BuiltPrerequisite>,
}

impl PrerequisiteCache {
    /// Empty cache for `source`.
    pub fn new(source: PrerequisiteSource) -> Self {
        Self {
            source,
            built: None,
        }
    }

    /// The cached build, if any.
    pub fn built(&self) -> Option<&BuiltPrerequisite> {
        self.built.as_ref()
    }

    /// Returns the cached bundle, building it first if needed.
    pub async fn ensure(&mut self, workspace: &Workspace) -> Result<&BuiltPrerequisite> {
        if self.built.is_none() {
            let built = build(&self.source, workspace).await?;
            self.built = Some(built);
        }
        self.built
            .as_ref()
            .ok_or_else(|| super::Error::GenericError("prerequisite cache is empty".to_string()))
    }

    /// Copies the cached bundle into `checkout`, building it first if needed.
    pub async fn install_into(&mut self, workspace: &Workspace, checkout: &Path) -> Result<()> {
        let built = self.ensure(workspace).await?;
        let name = built
            .path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("prerequisite"));
        let dest = checkout.join(name);
        log::info!("\tCopying {} into checkout...", dest.display());
        if built.path.is_dir() {
            fs::copy_dir(&built.path, &dest).await
        } else {
            fs::copy_file(&built.path, &dest).await
        }
    }
}

async fn build(prerequisite: &PrerequisiteSource, workspace: &Workspace) -> Result<BuiltPrerequisite> {
    log::info!("Building prerequisite: {}...", prerequisite.name);

    let checkout = workspace.checkout_dir(&prerequisite.name).await?;
    log::info!("\tCloning the repo...");
    source::clone_repo(&prerequisite.clone_url(), checkout.path()).await?;

    log::info!("\tBuilding debug version...");
    process::run_argv("prerequisite build", &prerequisite.build_argv(), checkout.path()).await?;

    let commit = source::head_commit(checkout.path()).await?;

    let built = checkout.path().join(&prerequisite.artifact);
    let cached = workspace.scratch().join(prerequisite.bundle_name());
    fs::remove_dir_all(&cached).await?;
    if built.is_dir() {
        fs::copy_dir(&built, &cached).await?;
    } else if built.is_file() {
        fs::copy_file(&built, &cached).await?;
    } else {
        bail!(
            "{} artifact {} not found after build",
            prerequisite.name,
            built.display()
        );
    }

    log::info!("\t{} built at {}", prerequisite.name, commit);
    Ok(BuiltPrerequisite {
        commit,
        path: cached,
    })
}
