//! Classification of stored issues.

use crate::config::LabelVocabulary;
use crate::store::StoredIssue;
use serde::Serialize;

/// Severity of a bug, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Major,
    Moderate,
    Minor,
}

impl Priority {
    /// All priorities in precedence order.
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::Major,
        Priority::Moderate,
        Priority::Minor,
    ];

    /// Returns the priority name, also the suffix of its severity label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }

    /// Sort rank: 1 for critical through 4 for minor.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 1,
            Self::Major => 2,
            Self::Moderate => 3,
            Self::Minor => 4,
        }
    }

    /// Returns the highest-precedence severity found in `labels`.
    pub fn from_labels<S: AsRef<str>>(labels: &[S], severity_prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| {
            labels.iter().any(|label| {
                label
                    .as_ref()
                    .strip_prefix(severity_prefix)
                    .is_some_and(|suffix| suffix == priority.as_str())
            })
        })
    }
}

/// Flags and priority derived from an issue's labels and associations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    /// Labeled as a contribution-challenge item.
    pub challenge: bool,
    /// Labeled picked, or already assigned.
    pub picked: bool,
    /// Has at least one assignee.
    pub assigned: bool,
    /// Has at least one closing pull request.
    pub linked: bool,
    pub priority: Option<Priority>,
}

impl Classification {
    /// Nobody assigned, not picked and no linked PR: needs maintainer triage.
    #[must_use]
    pub fn needs_attention(&self) -> bool {
        !self.assigned && !self.picked && !self.linked
    }
}

/// Returns true if the issue carries the bug label.
#[must_use]
pub fn is_bug(issue: &StoredIssue, labels: &LabelVocabulary) -> bool {
    has_label(issue, &labels.bug)
}

/// Classifies an issue.
#[must_use]
pub fn classify(issue: &StoredIssue, labels: &LabelVocabulary) -> Classification {
    let assigned = !issue.assignees.is_empty();
    Classification {
        challenge: has_label(issue, &labels.challenge),
        picked: assigned || has_label(issue, &labels.picked),
        assigned,
        linked: !issue.linked_prs.is_empty(),
        priority: Priority::from_labels(issue.labels.as_slice(), &labels.severity_prefix),
    }
}

fn has_label(issue: &StoredIssue, name: &str) -> bool {
    issue.labels.iter().any(|label| label == name)
}
