//! Storage error types.

use thiserror::Error;

/// Errors that can occur while reading or writing the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to prepare the database location.
    #[error("Failed to prepare database directory '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An upserted row could not be found by its identity key.
    #[error("No {table} row found for {identity} after upsert")]
    MissingRow { table: &'static str, identity: String },

    /// A number does not fit the database's integer type.
    #[error("Number {number} is out of range for storage")]
    NumberOutOfRange { number: u64 },
}
