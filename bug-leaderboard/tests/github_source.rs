use bug_leaderboard::{
    fetch_partition, Database, FetchError, FetchOptions, GitHubSource, Partition, RepositoryRef,
    TimelineEvent, WorkingSet,
};
use octocrab::Octocrab;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rate(remaining: u64) -> Value {
    json!({ "limit": 5000, "used": 5000 - remaining, "remaining": remaining, "reset": 0 })
}

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": { "core": rate(5000), "search": rate(30), "graphql": rate(5000) },
            "rate": rate(5000)
        })))
        .mount(&server)
        .await;
    server
}

fn source(server: &MockServer) -> GitHubSource {
    let octocrab = Octocrab::builder()
        .base_uri(server.uri())
        .unwrap()
        .build()
        .unwrap();
    GitHubSource::new(octocrab)
}

fn issue_node(number: u64, timeline: Value) -> Value {
    json!({
        "id": format!("I_{number}"),
        "number": number,
        "title": format!("issue {number}"),
        "body": "## Score\n- 300\n## Mentor\n* @mentor",
        "state": "OPEN",
        "url": format!("https://github.com/pingcap/tidb/issues/{number}"),
        "createdAt": "2021-06-01T10:00:00Z",
        "updatedAt": "2021-06-02T10:00:00Z",
        "closedAt": null,
        "author": { "login": "reporter" },
        "repository": { "name": "tidb", "owner": { "login": "pingcap" } },
        "labels": { "nodes": [{ "name": "type/bug" }, { "name": "sig/planner" }] },
        "assignees": { "nodes": [] },
        "timelineItems": { "nodes": timeline }
    })
}

fn page(nodes: Vec<Value>, end_cursor: Option<&str>) -> Value {
    json!({
        "data": { "repository": { "issues": {
            "pageInfo": { "hasNextPage": end_cursor.is_some(), "endCursor": end_cursor },
            "nodes": nodes
        } } }
    })
}

fn options(page_size: u32) -> FetchOptions {
    FetchOptions {
        page_size,
        debug: false,
        since: None,
    }
}

#[tokio::test]
async fn fetches_all_pages_of_a_partition() {
    let server = server().await;
    let closing = json!([{
        "__typename": "CrossReferencedEvent",
        "willCloseTarget": true,
        "source": {
            "__typename": "PullRequest",
            "number": 900,
            "title": "planner: fix",
            "state": "OPEN",
            "url": "https://github.com/pingcap/tidb/pull/900",
            "createdAt": "2021-06-03T10:00:00Z",
            "updatedAt": "2021-06-04T10:00:00Z",
            "author": { "login": "contributor" },
            "repository": { "name": "tidb", "owner": { "login": "pingcap" } }
        }
    }, {
        "__typename": "CrossReferencedEvent",
        "willCloseTarget": false,
        "source": { "__typename": "Issue" }
    }]);

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": {
            "owner": "pingcap", "name": "tidb", "labels": ["sig/planner"], "cursor": null, "limit": 2
        } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            vec![issue_node(1, closing), issue_node(2, json!([]))],
            Some("c1"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "cursor": "c1" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![issue_node(3, json!([]))], None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let working_set = WorkingSet::new();
    let count = fetch_partition(
        &source(&server),
        &working_set,
        &RepositoryRef::new("pingcap", "tidb"),
        &Partition::single("sig/planner"),
        options(2),
    )
    .await
    .unwrap();

    assert_eq!(count, 3);
    let issues = working_set.into_issues();
    assert_eq!(
        issues.iter().map(|i| i.number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(issues[0].labels.contains("type/bug"));
    assert_eq!(issues[0].timeline.len(), 2);
    assert!(matches!(
        issues[0].timeline[1],
        TimelineEvent::CrossReferenced {
            will_close_target: false,
            source: None
        }
    ));
    let closing: Vec<u64> = issues[0]
        .closing_pull_requests()
        .iter()
        .map(|pr| pr.number)
        .collect();
    assert_eq!(closing, vec![900]);
}

#[tokio::test]
async fn graphql_errors_abort_the_partition() {
    let server = server().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Something went wrong" }, { "message": "again" }]
        })))
        .mount(&server)
        .await;

    let result = fetch_partition(
        &source(&server),
        &WorkingSet::new(),
        &RepositoryRef::new("pingcap", "tidb"),
        &Partition::single("sig/planner"),
        options(100),
    )
    .await;

    assert!(
        matches!(result, Err(FetchError::GraphQl { .. })),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn closed_event_closers_never_become_close_edges() {
    let server = server().await;
    let mut closed = issue_node(7, json!([]));
    closed["closedEvents"] = json!({ "nodes": [{
        "__typename": "ClosedEvent",
        "closer": {
            "__typename": "PullRequest",
            "number": 901,
            "title": "planner: fix",
            "state": "MERGED",
            "url": "https://github.com/pingcap/tidb/pull/901",
            "createdAt": "2021-06-03T10:00:00Z",
            "updatedAt": "2021-06-04T10:00:00Z",
            "author": { "login": "contributor" },
            "repository": { "name": "tidb", "owner": { "login": "pingcap" } }
        }
    }] });

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![closed], None)))
        .expect(1)
        .mount(&server)
        .await;

    let working_set = WorkingSet::new();
    fetch_partition(
        &source(&server),
        &working_set,
        &RepositoryRef::new("pingcap", "tidb"),
        &Partition::single("sig/planner"),
        options(100),
    )
    .await
    .unwrap();

    let issues = working_set.into_issues();
    assert_eq!(issues.len(), 1);
    assert!(matches!(
        &issues[0].timeline[..],
        [TimelineEvent::Closed { closer: Some(pr) }] if pr.number == 901
    ));
    assert!(issues[0].closing_pull_requests().is_empty());

    let mut db = Database::open_in_memory().unwrap();
    db.persist_issue(&issues[0]).unwrap();
    let stored = db
        .open_issues_for_partition(&["sig/planner".to_string()])
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].linked_prs.is_empty());
}

#[tokio::test]
async fn missing_repository_is_reported() {
    let server = server().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "repository": null } })),
        )
        .mount(&server)
        .await;

    let result = fetch_partition(
        &source(&server),
        &WorkingSet::new(),
        &RepositoryRef::new("pingcap", "missing"),
        &Partition::single("sig/planner"),
        options(100),
    )
    .await;

    assert!(matches!(
        result,
        Err(FetchError::RepositoryNotFound { repository }) if repository == "pingcap/missing"
    ));
}
