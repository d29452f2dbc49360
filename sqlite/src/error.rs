//! Error types for SQLite sync operations.
//!
//! Only failures that abort a whole operation surface here. Individual
//! statement failures during a sync are logged and collected in the
//! report instead.

use thiserror::Error;

/// Errors that can occur while introspecting or modifying a database.
#[derive(Debug, Error)]
pub enum SyncError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// A query expected at least one row and got none.
    #[error("query returned no rows")]
    NoRows,

    /// A catalog row is missing a field or holds an unexpected value kind.
    #[error("unexpected value for field '{field}': {detail}")]
    UnexpectedValue { field: String, detail: String },
}

/// Convenience alias for results with [`SyncError`].
pub type Result<T> = std::result::Result<T, SyncError>;
