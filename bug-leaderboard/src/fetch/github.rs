//! GitHub GraphQL implementation of [`IssueSource`].

use super::wire::IssuesData;
use super::{FetchError, IssuePage, IssueSource, PageRequest};
use crate::model::Issue;
use crate::rate_limit::{ensure_rate_limit, Resource};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::debug;

/// Issues of a repository filtered by labels, newest update first.
///
/// Cross-references, the only events that can declare a closing pull request,
/// get the whole timeline window. The closing event is fetched through its own
/// connection so it never displaces them.
const ISSUES_QUERY: &str = r#"
query($owner: String!, $name: String!, $limit: Int!, $cursor: String, $labels: [String!], $since: DateTime) {
  repository(owner: $owner, name: $name) {
    issues(first: $limit, after: $cursor, labels: $labels, orderBy: {field: UPDATED_AT, direction: DESC}, filterBy: {since: $since}) {
      pageInfo { hasNextPage endCursor }
      nodes {
        id number title body state url createdAt updatedAt closedAt
        author { login }
        repository { name owner { login } }
        labels(last: 15) { nodes { name } }
        assignees(last: 15) { nodes { login createdAt } }
        timelineItems(first: 50, itemTypes: [CROSS_REFERENCED_EVENT]) {
          nodes {
            __typename
            ... on CrossReferencedEvent {
              willCloseTarget
              source { __typename ...pullRequestFields }
            }
          }
        }
        closedEvents: timelineItems(last: 1, itemTypes: [CLOSED_EVENT]) {
          nodes {
            __typename
            ... on ClosedEvent {
              closer { __typename ...pullRequestFields }
            }
          }
        }
      }
    }
  }
}

fragment pullRequestFields on PullRequest {
  number title state url createdAt updatedAt
  author { login }
  repository { name owner { login } }
}
"#;

/// Fetches issue pages through the GitHub GraphQL API.
#[derive(Clone)]
pub struct GitHubSource {
    octocrab: Octocrab,
}

impl GitHubSource {
    /// Wraps an authenticated GitHub client.
    #[must_use]
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl IssueSource for GitHubSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<IssuePage, FetchError> {
        debug!(
            repo = %request.repository,
            labels = ?request.labels,
            cursor = ?request.cursor,
            "Requesting issue page"
        );

        ensure_rate_limit(&self.octocrab, Resource::GraphQl).await?;

        let payload = json!({
            "query": ISSUES_QUERY,
            "variables": {
                "owner": request.repository.owner,
                "name": request.repository.name,
                "limit": request.page_size,
                "cursor": request.cursor,
                "labels": request.labels,
                "since": request.since,
            }
        });

        let data: IssuesData = self.octocrab.graphql(&payload).await.map_err(|e| match e {
            octocrab::Error::Graphql { source, .. } => FetchError::GraphQl {
                message: source.to_string(),
            },
            other => FetchError::GitHubError(other),
        })?;

        let connection = data
            .repository
            .ok_or_else(|| FetchError::RepositoryNotFound {
                repository: request.repository.to_string(),
            })?
            .issues;

        Ok(IssuePage {
            issues: connection.nodes.into_iter().map(Issue::from).collect(),
            next_cursor: connection.page_info.end_cursor,
            has_more: connection.page_info.has_next_page,
        })
    }
}
