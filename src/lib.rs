//! Build macOS kernel extensions from source and publish them as GitHub
//! releases.
//!
//! The pipeline has two halves:
//! - [`builder`] clones a plugin, runs its build and copies the artifacts
//!   into `Builds/{Category}/{Name}/{commit}/`
//! - [`publisher`] turns a build into a release with uploaded assets and a
//!   record in the `Config/config.json` manifest
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod builder;
pub mod cli;
pub mod error;
pub mod plugin;
pub mod process;
pub mod publisher;
pub mod settings;

// Re-export commonly used types
pub use error::{CliError, Error, Result};
