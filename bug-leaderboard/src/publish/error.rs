//! Publish error types.

use thiserror::Error;

/// Errors that can occur while publishing the report.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Failed to write the artifact.
    #[error("Failed to write '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Permission denied.
    #[error("Permission denied: no write access to {repository}")]
    PermissionDenied { repository: String },
}
