//! Per-step outcome types.

use crate::model::IdentityKey;
use serde::Serialize;

/// Result of fetching one label partition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PartitionOutcome {
    /// Every page of the partition was merged.
    Fetched {
        /// Partition name.
        partition: String,
        /// Issues fetched, duplicates across partitions included.
        count: usize,
    },

    /// The partition's fetch loop aborted.
    Failed {
        /// Partition name.
        partition: String,
        /// Error message.
        error: String,
    },
}

/// Result of persisting one issue.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    /// Issue, labels, assignees and closing edges were written.
    Persisted {
        /// Issue identity key.
        identity: IdentityKey,
    },

    /// Persisting the issue failed and was rolled back; the run continued.
    Failed {
        /// Issue identity key.
        identity: IdentityKey,
        /// Error message.
        error: String,
    },
}

/// Status of one publish target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    /// Nothing was attempted yet.
    #[default]
    Pending,

    /// The report was delivered.
    Published {
        /// File path or URL the report is available at.
        location: String,
    },

    /// Publishing was not attempted.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },

    /// Publishing failed.
    Failed {
        /// Error message.
        error: String,
    },
}

impl PublishStatus {
    /// Returns the status as a short string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Published { .. } => "published",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}
