//! Fetch error types.

use thiserror::Error;

/// Errors that abort the fetch of one partition.
#[derive(Debug, Error)]
pub enum FetchError {
    /// GitHub API transport error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The GraphQL endpoint answered with errors instead of data.
    #[error("GraphQL error: {message}")]
    GraphQl { message: String },

    /// The tracked repository does not exist or is not visible.
    #[error("Repository {repository} not found")]
    RepositoryNotFound { repository: String },

    /// The fetch task for a partition panicked or was cancelled.
    #[error("Fetch task for partition '{partition}' failed: {message}")]
    TaskFailed { partition: String, message: String },
}
