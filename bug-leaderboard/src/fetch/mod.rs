//! Concurrent, paginated ingestion of issues per label partition.
//!
//! Every partition is fetched by its own task. Tasks share nothing but the
//! [`WorkingSet`] they merge whole pages into, so a failing partition leaves
//! the others and the already-merged pages intact.

mod error;
mod github;
mod wire;

pub use error::FetchError;
pub use github::GitHubSource;

use crate::config::Partition;
use crate::model::{Issue, RepositoryRef};
use crate::summary::PartitionOutcome;
use crate::working_set::WorkingSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};

/// One page request against the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Repository to query.
    pub repository: RepositoryRef,

    /// Label filter; the tracker returns issues carrying any of them.
    pub labels: Vec<String>,

    /// Maximum issues per page.
    pub page_size: u32,

    /// Opaque cursor of the previous page, `None` for the first page.
    pub cursor: Option<String>,

    /// Only return issues updated at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

/// One page of issues returned by the tracker.
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    pub issues: Vec<Issue>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Capability to fetch issues by label, one page at a time.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches the page described by `request`.
    async fn fetch_page(&self, request: &PageRequest) -> Result<IssuePage, FetchError>;
}

/// Paging behaviour shared by all partitions of a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Maximum issues per page.
    pub page_size: u32,

    /// Stop after the first page.
    pub debug: bool,

    /// Incremental bound; a full refetch is always valid.
    pub since: Option<DateTime<Utc>>,
}

/// Returns the lazy sequence of pages for `request`.
///
/// The sequence ends after a page shorter than the page size, a page without
/// more data, the first page in debug mode, or the first error.
pub fn pages(
    source: &dyn IssueSource,
    request: PageRequest,
    debug: bool,
) -> impl Stream<Item = Result<IssuePage, FetchError>> + '_ {
    stream::try_unfold(Some(request), move |next| async move {
        let Some(request) = next else {
            return Ok::<_, FetchError>(None);
        };
        let page = source.fetch_page(&request).await?;
        let next = next_request(request, &page, debug);
        Ok(Some((page, next)))
    })
}

fn next_request(request: PageRequest, page: &IssuePage, debug: bool) -> Option<PageRequest> {
    let short_page = page.issues.len() < request.page_size as usize;
    if debug || short_page || !page.has_more {
        return None;
    }

    page.next_cursor.clone().map(|cursor| PageRequest {
        cursor: Some(cursor),
        ..request
    })
}

/// Fetches every page of one partition into the working set.
///
/// Returns the number of issues fetched for the partition, duplicates
/// across partitions included.
///
/// # Errors
///
/// Returns the first [`FetchError`]; pages merged before it stay merged.
pub async fn fetch_partition(
    source: &dyn IssueSource,
    working_set: &WorkingSet,
    repository: &RepositoryRef,
    partition: &Partition,
    options: FetchOptions,
) -> Result<usize, FetchError> {
    let span = info_span!("fetch_partition", partition = %partition.name, repo = %repository);

    async {
        info!(since = ?options.since, "Fetching partition");

        let request = PageRequest {
            repository: repository.clone(),
            labels: partition.labels.clone(),
            page_size: options.page_size,
            cursor: None,
            since: options.since,
        };

        let mut pages = std::pin::pin!(pages(source, request, options.debug));
        let mut total = 0;
        while let Some(page) = pages.try_next().await? {
            let count = page.issues.len();
            total += count;
            debug!(count, total, "Fetched page");
            working_set.merge_page(page.issues);
        }

        info!(count = total, "Fetched partition");
        Ok(total)
    }
    .instrument(span)
    .await
}

/// Fetches all partitions concurrently, one task per partition.
///
/// Outcomes are returned in partition order. A failed partition never
/// prevents the others from completing.
pub async fn fetch_all(
    source: Arc<dyn IssueSource>,
    working_set: Arc<WorkingSet>,
    repository: &RepositoryRef,
    partitions: &[Partition],
    options: FetchOptions,
) -> Vec<PartitionOutcome> {
    let handles: Vec<_> = partitions
        .iter()
        .cloned()
        .map(|partition| {
            let source = Arc::clone(&source);
            let working_set = Arc::clone(&working_set);
            let repository = repository.clone();
            let name = partition.name.clone();
            let handle = tokio::spawn(async move {
                fetch_partition(
                    source.as_ref(),
                    &working_set,
                    &repository,
                    &partition,
                    options,
                )
                .await
            });
            (name, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (partition, handle) in handles {
        let result = handle.await.unwrap_or_else(|e| {
            Err(FetchError::TaskFailed {
                partition: partition.clone(),
                message: e.to_string(),
            })
        });

        outcomes.push(match result {
            Ok(count) => PartitionOutcome::Fetched { partition, count },
            Err(e) => {
                error!(partition = %partition, error = %e, "Failed to fetch partition");
                PartitionOutcome::Failed {
                    partition,
                    error: e.to_string(),
                }
            }
        });
    }

    outcomes
}
