//! Error types for the store module.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// A blocking store task could not be joined.
    #[error("background task failed: {0}")]
    Background(String),

    /// Tasks must carry an identifier to be persisted.
    #[error("task has no identifier")]
    MissingIdentifier,

    /// Update targeted a task that is not in the store.
    #[error("task not found: {0}")]
    NotFound(Uuid),

    /// Insert targeted an identifier that is already in the store.
    #[error("task already exists: {0}")]
    Conflict(Uuid),

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
