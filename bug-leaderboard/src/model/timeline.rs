//! Issue timeline events relevant to closing-PR tracking.

use super::PullRequest;
use serde::{Deserialize, Serialize};

/// A timeline event on an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    /// The issue was referenced from elsewhere.
    ///
    /// `source` is `None` when the reference did not come from a pull request.
    CrossReferenced {
        will_close_target: bool,
        source: Option<PullRequest>,
    },

    /// The issue was closed, optionally by a pull request.
    Closed { closer: Option<PullRequest> },
}

impl TimelineEvent {
    /// Returns the pull request when this event declares it will close the issue.
    ///
    /// A closed event's closer is not a declaration and never qualifies.
    #[must_use]
    pub fn closing_pull_request(&self) -> Option<&PullRequest> {
        match self {
            Self::CrossReferenced {
                will_close_target: true,
                source: Some(pr),
            } => Some(pr),
            _ => None,
        }
    }
}
