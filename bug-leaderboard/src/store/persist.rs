//! Idempotent upsert of fetched issues.
//!
//! Each issue is written in its own transaction: the issue row, then its
//! label, assignee and closing-PR sets, each replaced wholesale. A failure
//! rolls back only that issue.

use super::{Database, StoreError};
use crate::extract::extract_score_and_mentor;
use crate::model::{IdentityKey, Issue, PullRequest};
use crate::summary::PersistOutcome;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

/// Inserts a new issue or updates the mutable fields of an existing one.
///
/// The update only fires when a field changed, so an unchanged issue returns
/// no row and its id is looked up by identity key instead.
const UPSERT_ISSUE: &str = "
    INSERT INTO issue (owner, repository, number, title, author, created_at, updated_at,
                       closed_at, state, url, score, mentor)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
    ON CONFLICT (owner, repository, number) DO UPDATE SET
        title = excluded.title,
        updated_at = excluded.updated_at,
        closed_at = excluded.closed_at,
        state = excluded.state,
        score = excluded.score,
        mentor = excluded.mentor
    WHERE issue.title IS NOT excluded.title
       OR issue.updated_at IS NOT excluded.updated_at
       OR issue.closed_at IS NOT excluded.closed_at
       OR issue.state IS NOT excluded.state
       OR issue.score IS NOT excluded.score
       OR issue.mentor IS NOT excluded.mentor
    RETURNING id";

const UPSERT_PULL_REQUEST: &str = "
    INSERT INTO pull_request (owner, repository, number, title, author, created_at,
                              updated_at, state, url)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT (owner, repository, number) DO UPDATE SET
        title = excluded.title,
        updated_at = excluded.updated_at,
        state = excluded.state
    WHERE pull_request.title IS NOT excluded.title
       OR pull_request.updated_at IS NOT excluded.updated_at
       OR pull_request.state IS NOT excluded.state
    RETURNING id";

impl Database {
    /// Persists one issue with its labels, assignees and closing-PR edges.
    ///
    /// Returns the issue's surrogate key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any statement fails; nothing of the issue is
    /// written in that case.
    pub fn persist_issue(&mut self, issue: &Issue) -> Result<i64, StoreError> {
        let (score, mentor) = extract_score_and_mentor(&issue.body);

        let tx = self.conn.transaction()?;
        let issue_id = upsert_issue(&tx, issue, &score, &mentor)?;
        replace_labels(&tx, issue_id, issue)?;
        replace_assignees(&tx, issue_id, issue)?;
        replace_closing_pull_requests(&tx, issue_id, issue)?;
        tx.commit()?;

        debug!(issue = %issue.identity(), issue_id, "Persisted issue");
        Ok(issue_id)
    }

    /// Persists every issue, continuing past failures.
    ///
    /// Returns one outcome per issue, in input order.
    pub fn persist_all(&mut self, issues: &[Issue]) -> Vec<PersistOutcome> {
        info!(count = issues.len(), "Persisting issues");

        let outcomes: Vec<PersistOutcome> = issues
            .iter()
            .map(|issue| {
                let identity = issue.identity();
                match self.persist_issue(issue) {
                    Ok(_) => PersistOutcome::Persisted { identity },
                    Err(e) => {
                        warn!(issue = %identity, error = %e, "Failed to persist issue");
                        PersistOutcome::Failed {
                            identity,
                            error: e.to_string(),
                        }
                    }
                }
            })
            .collect();

        info!(
            persisted = outcomes
                .iter()
                .filter(|o| matches!(o, PersistOutcome::Persisted { .. }))
                .count(),
            "Persist complete"
        );
        outcomes
    }
}

fn sql_number(number: u64) -> Result<i64, StoreError> {
    i64::try_from(number).map_err(|_| StoreError::NumberOutOfRange { number })
}

/// Looks up a surrogate key by identity key.
fn lookup_id(conn: &Connection, table: &'static str, key: &IdentityKey) -> Result<i64, StoreError> {
    let sql = format!("SELECT id FROM {table} WHERE owner = ?1 AND repository = ?2 AND number = ?3");
    conn.query_row(
        &sql,
        params![
            key.repository.owner,
            key.repository.name,
            sql_number(key.number)?
        ],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| StoreError::MissingRow {
        table,
        identity: key.to_string(),
    })
}

fn upsert_issue(
    conn: &Connection,
    issue: &Issue,
    score: &str,
    mentor: &str,
) -> Result<i64, StoreError> {
    let returned: Option<i64> = conn
        .query_row(
            UPSERT_ISSUE,
            params![
                issue.repository.owner,
                issue.repository.name,
                sql_number(issue.number)?,
                issue.title,
                issue.author,
                issue.created_at,
                issue.updated_at,
                issue.closed_at,
                issue.state.as_str(),
                issue.url,
                score,
                mentor,
            ],
            |row| row.get(0),
        )
        .optional()?;

    match returned {
        Some(id) => Ok(id),
        None => lookup_id(conn, "issue", &issue.identity()),
    }
}

fn upsert_pull_request(conn: &Connection, pr: &PullRequest) -> Result<i64, StoreError> {
    let returned: Option<i64> = conn
        .query_row(
            UPSERT_PULL_REQUEST,
            params![
                pr.repository.owner,
                pr.repository.name,
                sql_number(pr.number)?,
                pr.title,
                pr.author,
                pr.created_at,
                pr.updated_at,
                pr.state.as_str(),
                pr.url,
            ],
            |row| row.get(0),
        )
        .optional()?;

    match returned {
        Some(id) => Ok(id),
        None => lookup_id(conn, "pull_request", &pr.identity()),
    }
}

fn replace_labels(conn: &Connection, issue_id: i64, issue: &Issue) -> Result<(), StoreError> {
    conn.execute("DELETE FROM label WHERE issue_id = ?1", params![issue_id])?;
    let mut insert = conn.prepare("INSERT OR IGNORE INTO label (issue_id, name) VALUES (?1, ?2)")?;
    for label in &issue.labels {
        insert.execute(params![issue_id, label])?;
    }
    Ok(())
}

fn replace_assignees(conn: &Connection, issue_id: i64, issue: &Issue) -> Result<(), StoreError> {
    conn.execute("DELETE FROM assignee WHERE issue_id = ?1", params![issue_id])?;
    let mut insert = conn.prepare(
        "INSERT OR IGNORE INTO assignee (issue_id, name, created_at) VALUES (?1, ?2, ?3)",
    )?;
    for assignee in &issue.assignees {
        insert.execute(params![issue_id, assignee.login, assignee.created_at])?;
    }
    Ok(())
}

fn replace_closing_pull_requests(
    conn: &Connection,
    issue_id: i64,
    issue: &Issue,
) -> Result<(), StoreError> {
    conn.execute("DELETE FROM close WHERE issue_id = ?1", params![issue_id])?;
    for pr in issue.closing_pull_requests() {
        let pr_id = upsert_pull_request(conn, pr)?;
        conn.execute(
            "INSERT OR IGNORE INTO close (issue_id, pull_request_id) VALUES (?1, ?2)",
            params![issue_id, pr_id],
        )?;
    }
    Ok(())
}
