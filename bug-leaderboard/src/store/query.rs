//! Read side used by the report.

use super::{Database, StoreError};
use rusqlite::{params, params_from_iter};

/// A pull request linked to a stored issue as its closer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedPullRequest {
    pub number: u64,
    pub url: String,
}

/// An open issue as stored, with its associations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredIssue {
    /// Surrogate key.
    pub id: i64,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub score: String,
    pub mentor: String,
    /// Label names, alphabetical.
    pub labels: Vec<String>,
    /// Assignee logins, in assignment order.
    pub assignees: Vec<String>,
    /// Closing pull requests, by number.
    pub linked_prs: Vec<LinkedPullRequest>,
}

impl Database {
    /// Returns the open issues carrying any of `labels`, ordered by identity key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a query fails.
    pub fn open_issues_for_partition(
        &self,
        labels: &[String],
    ) -> Result<Vec<StoredIssue>, StoreError> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=labels.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT i.id, i.number, i.title, i.url, i.score, i.mentor
             FROM issue i
             WHERE i.state = 'OPEN'
               AND EXISTS (SELECT 1 FROM label l WHERE l.issue_id = i.id AND l.name IN ({placeholders}))
             ORDER BY i.owner, i.repository, i.number"
        );

        let mut statement = self.conn.prepare(&sql)?;
        let mut issues = statement
            .query_map(params_from_iter(labels), |row| {
                Ok(StoredIssue {
                    id: row.get(0)?,
                    number: row.get::<_, i64>(1)?.unsigned_abs(),
                    title: row.get(2)?,
                    url: row.get(3)?,
                    score: row.get(4)?,
                    mentor: row.get(5)?,
                    ..StoredIssue::default()
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for issue in &mut issues {
            issue.labels = self.labels_of(issue.id)?;
            issue.assignees = self.assignees_of(issue.id)?;
            issue.linked_prs = self.linked_pull_requests_of(issue.id)?;
        }

        Ok(issues)
    }

    fn labels_of(&self, issue_id: i64) -> Result<Vec<String>, StoreError> {
        let mut statement = self
            .conn
            .prepare_cached("SELECT name FROM label WHERE issue_id = ?1 ORDER BY name")?;
        let labels = statement
            .query_map(params![issue_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(labels)
    }

    fn assignees_of(&self, issue_id: i64) -> Result<Vec<String>, StoreError> {
        let mut statement = self.conn.prepare_cached(
            "SELECT name FROM assignee WHERE issue_id = ?1 ORDER BY rowid",
        )?;
        let assignees = statement
            .query_map(params![issue_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(assignees)
    }

    fn linked_pull_requests_of(&self, issue_id: i64) -> Result<Vec<LinkedPullRequest>, StoreError> {
        let mut statement = self.conn.prepare_cached(
            "SELECT p.number, p.url
             FROM close c JOIN pull_request p ON p.id = c.pull_request_id
             WHERE c.issue_id = ?1
             ORDER BY p.owner, p.repository, p.number",
        )?;
        let prs = statement
            .query_map(params![issue_id], |row| {
                Ok(LinkedPullRequest {
                    number: row.get::<_, i64>(0)?.unsigned_abs(),
                    url: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(prs)
    }
}
