//! Publisher error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for publish operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while publishing a build
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Api {
        /// HTTP method
        method: String,
        /// Request URL
        url: String,
        /// Response status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// No content type could be determined for an upload
    #[error("cannot determine MIME type of {}", path.display())]
    MimeUndetectable {
        /// File being uploaded
        path: PathBuf,
    },

    /// An upload source is not a regular file
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    /// A URL returned by the API could not be parsed
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// The `Link` header pattern failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Manifest or payload (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The committer date is not a valid timestamp
    #[error("invalid commit date `{date}`: {source}")]
    CommitDate {
        /// Raw date string
        date: String,
        /// Parser error
        #[source]
        source: chrono::ParseError,
    },

    /// The release description template failed to render
    #[error("description template: {0}")]
    Template(#[from] handlebars::RenderError),

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
}

/// Attaches path context to IO results.
pub(crate) trait ErrorExt<T> {
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
