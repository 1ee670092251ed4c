//! Release publishing.
//!
//! [`Publisher::add_built`] takes a [`crate::builder::BuildResult`] and:
//! 1. Replaces any manifest record for the same commit
//! 2. Deletes the previous release and tag for that commit
//! 3. Creates the release, hashes and uploads every artifact
//! 4. Writes the release body and persists the manifest
//!
//! # Module Organization
//!
//! - `checksum` - SHA-256 of files and bundle trees
//! - `config_repo` - Commit and push of the manifest checkout
//! - [`description`] - Release body template
//! - [`github`] - REST client
//! - [`manifest`] - Persisted release history
//! - [`mime`] - Upload content types

mod checksum;
mod config_repo;
pub mod description;
mod error;
pub mod github;
pub mod manifest;
pub mod mime;
mod release;

pub use checksum::sha256;
pub use error::{Error, Result};
pub use github::{Asset, GitHubClient, NewRelease, Release};
pub use manifest::{Manifest, PluginEntry, ReleaseRecord};
pub use release::Publisher;
