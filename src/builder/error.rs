//! Builder error types and context helpers.

use crate::process::CommandError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for build operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building a plugin
#[derive(Error, Debug)]
pub enum Error {
    /// An external command (git, xcodebuild, task, version command) failed
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A debug/release artifact pattern matched nothing
    #[error("pattern `{pattern}` matched no files under {}", root.display())]
    NoMatches {
        /// The glob pattern as written in the descriptor
        pattern: String,
        /// Directory the pattern was resolved against
        root: PathBuf,
    },

    /// A glob pattern could not be parsed
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern
        pattern: String,
        /// Parser error
        #[source]
        source: glob::PatternError,
    },

    /// No version command and the plugin type has no plist to read
    #[error("{plugin}: no version command configured and type {kind} has no Info.plist version")]
    MissingVersionSource {
        /// Plugin name
        plugin: String,
        /// Plugin type
        kind: crate::plugin::PluginType,
    },

    /// The Info.plist could not be read or lacks the version key
    #[error("reading {key} from {}: {reason}", path.display())]
    PlistVersion {
        /// Plist path
        path: PathBuf,
        /// Key looked up
        key: String,
        /// What went wrong
        reason: String,
    },

    /// Filesystem operation failed on a known path
    #[error("{context} {}: {source}", path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO errors without path context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Attaches path context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with a description of the operation and the path.
    fn fs_context(self, context: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::builder::Error::GenericError(format!($($arg)*)).into())
    };
}
