//! Internal records for fetched tracker data.
//!
//! Everything the remote API returns is decoded once at the fetch boundary
//! into these types; the store and the working set only ever see them.

mod issue;
mod pull_request;
mod timeline;

pub use issue::{Assignee, Issue, IssueId, IssueState};
pub use pull_request::{PullRequest, PullRequestState};
pub use timeline::TimelineEvent;

#[cfg(test)]
pub(crate) use issue::fixtures;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner and name of a repository on the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryRef {
    /// Creates a repository reference.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Natural key of an issue or pull request: `owner/name#number`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IdentityKey {
    /// Repository the item lives in.
    pub repository: RepositoryRef,

    /// Human-facing number.
    pub number: u64,
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.number)
    }
}
