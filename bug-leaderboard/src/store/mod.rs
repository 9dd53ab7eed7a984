//! SQLite storage of the mirrored issues.
//!
//! The schema is embedded and applied idempotently on every open. Writes go
//! through [`Database::persist_issue`]; the report reads through
//! [`Database::open_issues_for_partition`].

mod error;
mod persist;
mod query;

pub use error::StoreError;
pub use query::{LinkedPullRequest, StoredIssue};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the leaderboard database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory can't be created or SQLite fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "Opening database");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        Self::init(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if SQLite fails.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;
        debug!("Schema applied");
        Ok(Self { conn })
    }

    /// Returns the newest `updated_at` of any stored issue.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub fn latest_update(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let latest = self
            .conn
            .query_row("SELECT max(updated_at) FROM issue", [], |row| row.get(0))?;
        Ok(latest)
    }

    /// Returns the update time every stored issue is known to be current to.
    ///
    /// `None` until a complete sync has been recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub fn sync_watermark(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let watermark = self
            .conn
            .query_row("SELECT synced_to FROM sync_state WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(watermark)
    }

    /// Advances the sync watermark to the newest stored `updated_at`.
    ///
    /// Call only after every partition was fetched and every issue persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a query fails.
    pub fn record_sync(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let Some(latest) = self.latest_update()? else {
            return Ok(None);
        };
        self.conn.execute(
            "INSERT INTO sync_state (id, synced_to) VALUES (1, ?1)
             ON CONFLICT (id) DO UPDATE SET synced_to = excluded.synced_to",
            params![latest],
        )?;
        debug!(synced_to = %latest, "Recorded sync watermark");
        Ok(Some(latest))
    }
}
