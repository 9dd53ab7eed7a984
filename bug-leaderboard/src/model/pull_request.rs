//! Pull request records.

use super::{IdentityKey, RepositoryRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

impl PullRequestState {
    /// Returns the state as stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Merged => "MERGED",
        }
    }
}

/// A pull request referenced as a closer of a tracked issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub repository: RepositoryRef,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub state: PullRequestState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub url: String,
}

impl PullRequest {
    /// Returns the natural key of this pull request.
    #[must_use]
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            repository: self.repository.clone(),
            number: self.number,
        }
    }
}
