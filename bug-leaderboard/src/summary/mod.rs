//! Run summary types and helpers.

mod result;
mod run_summary;

pub use result::{PartitionOutcome, PersistOutcome, PublishStatus};
pub use run_summary::RunSummary;
