//! Error types for the task controller.

use tasks_store::StoreError;
use tasks_sync::{ConfigError, NetworkError};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Sync error.
    #[error("sync error: {0}")]
    Network(#[from] NetworkError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task not found.
    #[error("task not found: {0}")]
    NotFound(Uuid),

    /// The task cannot be stored as given.
    #[error("invalid task: {0}")]
    InvalidTask(String),
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;
