//! Error types for the sync module.

use thiserror::Error;

/// Why a sync operation did not complete.
///
/// This set is closed: every failure of [`put`](crate::SyncClient::put_task)
/// or [`fetch`](crate::SyncClient::fetch_tasks_from_server) maps to exactly
/// one variant. All of them are terminal; nothing is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// The task has no identifier, so it has no remote address.
    #[error("task has no identifier")]
    NoIdentifier,

    /// The request could not be completed.
    #[error("request failed: {0}")]
    OtherError(String),

    /// The server answered with an empty body.
    #[error("no data returned")]
    NoData,

    /// The response could not be decoded or merged into the local store.
    #[error("could not decode tasks: {0}")]
    NoDecode(String),

    /// The task could not be encoded as JSON.
    #[error("could not encode task: {0}")]
    NoEncode(String),

    /// The task has no wire representation.
    #[error("task has no representation")]
    NoRep,
}

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, TLS or body read failure.
    #[error("request error: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("unexpected status: {0}")]
    Status(u16),

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = e.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Invalid sync configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
