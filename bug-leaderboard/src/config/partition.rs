//! Label partitions.

use serde::{Deserialize, Serialize};

/// A named subset of tracked issues selected by a fixed label set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Partition {
    /// Display name, also used as the report section anchor.
    pub name: String,

    /// Labels selecting the partition. An issue carrying any of them belongs to it.
    pub labels: Vec<String>,
}

impl Partition {
    /// Creates a partition selected by a single label named after it.
    pub fn single(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            name: label.clone(),
            labels: vec![label],
        }
    }
}
