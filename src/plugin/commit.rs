//! Source commit metadata as returned by the GitHub commits API.

use serde::Deserialize;

/// Commit a build was produced from.
#[derive(Clone, Debug, Deserialize)]
pub struct CommitInfo {
    /// Full commit hash
    pub sha: String,
    /// Web URL of the commit (`.../commit/<sha>`)
    pub html_url: String,
    /// Git-level commit data
    pub commit: CommitDetails,
}

/// Message and committer of a commit.
#[derive(Clone, Debug, Deserialize)]
pub struct CommitDetails {
    /// Full commit message
    pub message: String,
    /// Committer identity and timestamp
    pub committer: Signature,
}

/// Committer signature; only the date is used.
#[derive(Clone, Debug, Deserialize)]
pub struct Signature {
    /// ISO 8601 timestamp
    pub date: String,
}

impl CommitInfo {
    /// First seven characters of the hash.
    pub fn short_sha(&self) -> &str {
        short_sha(&self.sha)
    }

    /// Commit URL with `/commit/` rewritten to `/tree/`.
    pub fn tree_url(&self) -> String {
        self.html_url.replace("/commit/", "/tree/")
    }
}

/// First seven characters of a commit hash (the whole string if shorter).
pub fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}
