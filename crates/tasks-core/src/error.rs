//! Error types for the core types.

use thiserror::Error;

/// Errors raised while interpreting task data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown priority: {0}")]
    UnknownPriority(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
