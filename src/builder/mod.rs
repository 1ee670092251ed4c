//! Plugin build orchestration.
//!
//! This module provides the main [`Builder`] that clones a plugin, runs its
//! tasks and build tool, resolves its version and copies the artifacts into
//! the output layout.
//!
//! # Overview
//!
//! For each plugin the builder:
//! 1. Derives the debug-substituted [`BuildPlan`]
//! 2. Clones the source into a scoped checkout and resolves the commit
//! 3. Installs the shared prerequisite when the plugin needs it
//! 4. Runs pre-build tasks, the build, and post-build tasks
//! 5. Resolves the version string
//! 6. Copies artifacts into `Builds/{Category}/{Name}/{commit}/`
//!
//! # Module Organization
//!
//! - [`artifacts`] - Pattern expansion and output layout
//! - `orchestrator` - The [`Builder`] itself
//! - [`plan`] - Debug substitutions
//! - `prerequisite` - Caller-owned prerequisite cache
//! - `source` - git clone/checkout/rev-parse
//! - [`tool_detection`] - External tool availability checking
//! - `version` - Version command and Info.plist lookup
//! - `workspace` - Scratch/output provisioning with scoped cleanup

pub mod artifacts;
mod error;
mod fs;
mod orchestrator;
pub mod plan;
mod prerequisite;
mod source;
pub mod tool_detection;
mod version;
mod workspace;

pub use error::{Error, ErrorExt, Result};
pub use orchestrator::{BuildResult, Builder, xcodebuild_args};
pub use plan::{BuildPlan, debugify};
pub use prerequisite::{BuiltPrerequisite, PrerequisiteCache};
pub use version::{BUNDLE_VERSION_KEY, read_bundle_version, resolve_version};
pub use workspace::{ScopedDir, Workspace};
