//! Transport abstraction for the sync client.
//!
//! The transport moves bytes to and from the remote document store. The
//! production implementation speaks HTTP via reqwest; an in-memory
//! implementation stands in for the remote in tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::TransportError;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Transport trait for talking to the remote document store.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Replace the document at `url` with a JSON body.
    async fn put(&self, url: &Url, body: Vec<u8>) -> Result<()>;

    /// Read the document at `url`.
    ///
    /// An empty response body is returned as empty bytes, not an error.
    async fn get(&self, url: &Url) -> Result<Bytes>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn put(&self, url: &Url, body: Vec<u8>) -> Result<()> {
        (**self).put(url, body).await
    }

    async fn get(&self, url: &Url) -> Result<Bytes> {
        (**self).get(url).await
    }
}

/// HTTP transport backed by reqwest.
pub mod http {
    use std::time::Duration;

    use reqwest::header::{HeaderValue, CONTENT_TYPE};

    use super::*;
    use crate::error::ConfigError;

    /// Configuration for the HTTP transport.
    #[derive(Debug, Clone)]
    pub struct HttpConfig {
        /// Per-request timeout. `None` leaves it to the client's defaults.
        pub timeout: Option<Duration>,
        /// Sent as the `User-Agent` header.
        pub user_agent: String,
    }

    impl Default for HttpConfig {
        fn default() -> Self {
            Self {
                timeout: None,
                user_agent: concat!("tasks-sync/", env!("CARGO_PKG_VERSION")).to_string(),
            }
        }
    }

    /// Transport over HTTP(S).
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        /// Build a transport from configuration.
        pub fn new(config: &HttpConfig) -> std::result::Result<Self, ConfigError> {
            let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
            if let Some(timeout) = config.timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder
                .build()
                .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
            Ok(Self { client })
        }

        /// Wrap an existing client.
        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn put(&self, url: &Url, body: Vec<u8>) -> Result<()> {
            tracing::debug!(%url, bytes = body.len(), "PUT");
            self.client
                .put(url.clone())
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body)
                .send()
                .await?
                .error_for_status()?;
            Ok(())
        }

        async fn get(&self, url: &Url) -> Result<Bytes> {
            tracing::debug!(%url, "GET");
            let body = self
                .client
                .get(url.clone())
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;
            Ok(body)
        }
    }
}

/// A simple in-memory remote for testing.
///
/// Holds a single collection of JSON documents keyed by the last path
/// segment of the request URL, records every request, and can be told to
/// fail or to answer the next read with a canned body.
pub mod memory {
    use std::collections::{BTreeMap, VecDeque};

    use serde_json::Value;
    use tasks_core::TaskRepresentation;
    use tokio::sync::Mutex;

    use super::*;

    /// HTTP method of a recorded request.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Method {
        Get,
        Put,
    }

    /// A request as seen by the in-memory remote.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRequest {
        pub method: Method,
        pub url: Url,
        pub body: Option<Vec<u8>>,
    }

    #[derive(Default)]
    struct RemoteState {
        documents: BTreeMap<String, Value>,
        requests: Vec<RecordedRequest>,
        failures: VecDeque<TransportError>,
        canned_get: Option<Bytes>,
    }

    /// In-memory transport implementation.
    #[derive(Default)]
    pub struct MemoryTransport {
        state: Mutex<RemoteState>,
    }

    impl MemoryTransport {
        /// Create an empty remote.
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Store a representation under an arbitrary key.
        pub async fn seed(&self, key: &str, rep: &TaskRepresentation) {
            let value = serde_json::to_value(rep).unwrap_or(Value::Null);
            self.seed_raw(key, value).await;
        }

        /// Store an arbitrary JSON document under a key.
        pub async fn seed_raw(&self, key: &str, value: Value) {
            self.state
                .lock()
                .await
                .documents
                .insert(key.to_string(), value);
        }

        /// Make the next request fail with `error`.
        pub async fn fail_next(&self, error: TransportError) {
            self.state.lock().await.failures.push_back(error);
        }

        /// Answer the next GET with `body` instead of the stored documents.
        pub async fn respond_next_get(&self, body: impl Into<Bytes>) {
            self.state.lock().await.canned_get = Some(body.into());
        }

        /// All requests received so far.
        pub async fn requests(&self) -> Vec<RecordedRequest> {
            self.state.lock().await.requests.clone()
        }

        /// The stored documents.
        pub async fn documents(&self) -> BTreeMap<String, Value> {
            self.state.lock().await.documents.clone()
        }
    }

    fn document_key(url: &Url) -> Option<String> {
        let segment = url.path_segments()?.last()?;
        let key = segment.strip_suffix(".json")?;
        (!key.is_empty()).then(|| key.to_string())
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn put(&self, url: &Url, body: Vec<u8>) -> Result<()> {
            let mut state = self.state.lock().await;
            state.requests.push(RecordedRequest {
                method: Method::Put,
                url: url.clone(),
                body: Some(body.clone()),
            });
            if let Some(error) = state.failures.pop_front() {
                return Err(error);
            }

            let key = document_key(url).ok_or(TransportError::Status(400))?;
            let value: Value =
                serde_json::from_slice(&body).map_err(|_| TransportError::Status(400))?;
            state.documents.insert(key, value);
            Ok(())
        }

        async fn get(&self, url: &Url) -> Result<Bytes> {
            let mut state = self.state.lock().await;
            state.requests.push(RecordedRequest {
                method: Method::Get,
                url: url.clone(),
                body: None,
            });
            if let Some(error) = state.failures.pop_front() {
                return Err(error);
            }
            if let Some(body) = state.canned_get.take() {
                return Ok(body);
            }

            // An empty collection reads as JSON null, like the real store.
            let body = if state.documents.is_empty() {
                b"null".to_vec()
            } else {
                serde_json::to_vec(&state.documents)
                    .map_err(|e| TransportError::Request(e.to_string()))?
            };
            Ok(Bytes::from(body))
        }
    }
}
