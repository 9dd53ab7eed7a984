#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod publish;
pub mod rate_limit;
pub mod report;
pub mod runner;
pub mod store;
pub mod summary;
pub mod working_set;

pub use config::{ConfigError, LabelVocabulary, LeaderboardConfig, Partition};
pub use extract::extract_score_and_mentor;
pub use fetch::{
    fetch_all, fetch_partition, pages, FetchError, FetchOptions, GitHubSource, IssuePage,
    IssueSource, PageRequest,
};
pub use model::{
    Assignee, IdentityKey, Issue, IssueId, IssueState, PullRequest, PullRequestState,
    RepositoryRef, TimelineEvent,
};
pub use publish::{
    publish_to_issue, resolve_report_issue, write_artifact, PublishError, ReportIssue,
};
pub use rate_limit::{
    check_rate_limit, ensure_rate_limit, wait_if_needed, RateLimitInfo, Resource,
};
pub use report::{
    build_report, classify, DocumentRenderer, Priority, Report, ReportError, TemplateError,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use store::{Database, LinkedPullRequest, StoreError, StoredIssue};
pub use summary::{PartitionOutcome, PersistOutcome, PublishStatus, RunSummary};
pub use working_set::WorkingSet;
