//! GraphQL response shapes, decoded once into [`crate::model`] records.

use crate::model::{
    Assignee, Issue, IssueId, IssueState, PullRequest, PullRequestState, RepositoryRef,
    TimelineEvent,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Login shown for authors whose account no longer exists.
const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Deserialize)]
pub(crate) struct IssuesData {
    pub repository: Option<RepositoryIssues>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryIssues {
    pub issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueConnection {
    pub page_info: PageInfo,
    pub nodes: Vec<IssueNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    name: String,
    owner: Owner,
}

impl From<RepositoryNode> for RepositoryRef {
    fn from(node: RepositoryNode) -> Self {
        RepositoryRef::new(node.owner.login, node.name)
    }
}

#[derive(Debug, Deserialize)]
struct LabelNode {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    login: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueNode {
    id: String,
    number: u64,
    title: String,
    #[serde(default)]
    body: String,
    state: IssueState,
    url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    author: Option<Actor>,
    repository: RepositoryNode,
    labels: Nodes<LabelNode>,
    assignees: Nodes<UserNode>,
    timeline_items: Nodes<TimelineNode>,
    #[serde(default = "no_nodes")]
    closed_events: Nodes<TimelineNode>,
}

fn no_nodes<T>() -> Nodes<T> {
    Nodes { nodes: Vec::new() }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    title: String,
    state: PullRequestState,
    url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author: Option<Actor>,
    repository: RepositoryNode,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum ReferenceSource {
    PullRequest(PullRequestNode),
    #[serde(other)]
    Other,
}

impl ReferenceSource {
    fn into_pull_request(self) -> Option<PullRequest> {
        match self {
            Self::PullRequest(node) => Some(node.into()),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum TimelineNode {
    CrossReferencedEvent {
        #[serde(rename = "willCloseTarget")]
        will_close_target: bool,
        source: ReferenceSource,
    },
    ClosedEvent {
        closer: Option<ReferenceSource>,
    },
    #[serde(other)]
    Other,
}

fn login(actor: Option<Actor>) -> String {
    actor.map_or_else(|| GHOST_LOGIN.to_string(), |actor| actor.login)
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        PullRequest {
            repository: node.repository.into(),
            number: node.number,
            title: node.title,
            author: login(node.author),
            state: node.state,
            created_at: node.created_at,
            updated_at: node.updated_at,
            url: node.url,
        }
    }
}

impl TimelineNode {
    fn into_event(self) -> Option<TimelineEvent> {
        match self {
            Self::CrossReferencedEvent {
                will_close_target,
                source,
            } => Some(TimelineEvent::CrossReferenced {
                will_close_target,
                source: source.into_pull_request(),
            }),
            Self::ClosedEvent { closer } => Some(TimelineEvent::Closed {
                closer: closer.and_then(ReferenceSource::into_pull_request),
            }),
            Self::Other => None,
        }
    }
}

impl From<IssueNode> for Issue {
    fn from(node: IssueNode) -> Self {
        Issue {
            id: IssueId(node.id),
            repository: node.repository.into(),
            number: node.number,
            title: node.title,
            body: node.body,
            author: login(node.author),
            created_at: node.created_at,
            updated_at: node.updated_at,
            closed_at: node.closed_at,
            state: node.state,
            url: node.url,
            labels: node.labels.nodes.into_iter().map(|l| l.name).collect(),
            assignees: node
                .assignees
                .nodes
                .into_iter()
                .map(|user| Assignee {
                    login: user.login,
                    created_at: user.created_at,
                })
                .collect(),
            timeline: node
                .timeline_items
                .nodes
                .into_iter()
                .chain(node.closed_events.nodes)
                .filter_map(TimelineNode::into_event)
                .collect(),
        }
    }
}
