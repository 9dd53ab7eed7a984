//! Issue records.

use super::{IdentityKey, PullRequest, RepositoryRef, TimelineEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Opaque tracker-assigned identity of an issue, stable across fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub String);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    /// Returns the state as stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

/// A user assigned to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    /// Login handle.
    pub login: String,

    /// Timestamp carried for the assignment.
    pub created_at: DateTime<Utc>,
}

/// One issue as observed by the latest fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub repository: RepositoryRef,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub state: IssueState,
    pub url: String,
    pub labels: BTreeSet<String>,
    pub assignees: Vec<Assignee>,
    pub timeline: Vec<TimelineEvent>,
}

impl Issue {
    /// Returns the natural key of this issue.
    #[must_use]
    pub fn identity(&self) -> IdentityKey {
        IdentityKey {
            repository: self.repository.clone(),
            number: self.number,
        }
    }

    /// Pull requests that declared they will close this issue.
    ///
    /// A PR referenced by several closing events is yielded once.
    pub fn closing_pull_requests(&self) -> Vec<&PullRequest> {
        let mut seen = BTreeSet::new();
        self.timeline
            .iter()
            .filter_map(TimelineEvent::closing_pull_request)
            .filter(|pr| seen.insert(pr.identity()))
            .collect()
    }
}
