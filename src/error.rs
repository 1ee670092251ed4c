//! Top-level error types for the build and publish pipeline.
//!
//! Module-specific failures ([`crate::builder::Error`],
//! [`crate::publisher::Error`]) convert into [`Error`] so the CLI can report
//! any of them uniformly.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// CLI argument and configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Build failures
    #[error("Build failed: {0}")]
    Build(#[from] crate::builder::Error),

    /// Publish failures
    #[error("Publish failed: {0}")]
    Publish(#[from] crate::publisher::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl Error {
    /// Captured stdout/stderr of a failed external command, if that is what failed.
    pub fn captured_output(&self) -> Option<String> {
        match self {
            Self::Build(crate::builder::Error::Command(e)) => e.captured_output(),
            _ => None,
        }
    }
}
