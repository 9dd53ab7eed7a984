//! Run summary types.

use super::result::{PartitionOutcome, PersistOutcome, PublishStatus};

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of partitions fetched completely.
    pub partitions_fetched: usize,

    /// Partitions whose fetch failed, with the error.
    pub partition_failures: Vec<(String, String)>,

    /// Number of distinct issues in the working set.
    pub issues_fetched: usize,

    /// Number of issues persisted.
    pub issues_persisted: usize,

    /// Issues that failed to persist, by identity, with the error.
    pub persist_failures: Vec<(String, String)>,

    /// Number of partition tables rendered.
    pub partitions_rendered: usize,

    /// Local artifact status.
    pub artifact: PublishStatus,

    /// Remote report issue status.
    pub remote: PublishStatus,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the summary with a partition fetch outcome.
    pub fn record_partition(&mut self, outcome: &PartitionOutcome) {
        match outcome {
            PartitionOutcome::Fetched { .. } => self.partitions_fetched += 1,
            PartitionOutcome::Failed { partition, error } => self
                .partition_failures
                .push((partition.clone(), error.clone())),
        }
    }

    /// Updates the summary with an issue persist outcome.
    pub fn record_persist(&mut self, outcome: &PersistOutcome) {
        match outcome {
            PersistOutcome::Persisted { .. } => self.issues_persisted += 1,
            PersistOutcome::Failed { identity, error } => self
                .persist_failures
                .push((identity.to_string(), error.clone())),
        }
    }

    /// Returns true if any partition fetch or issue persist failed.
    ///
    /// Publish failures don't count: persisted state is valid without them.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.partition_failures.is_empty() || !self.persist_failures.is_empty()
    }

    /// Returns true if all fetch and persist operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        !self.has_failures()
    }
}
