//! The sync client.
//!
//! Pushes single tasks to the remote document store and pulls the whole
//! collection back into the local store. Every operation has an async form
//! and a callback form; callbacks are delivered through the configured
//! [`Dispatcher`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tasks_core::{Task, TaskRepresentation};
use tasks_store::TaskStore;
use tokio::runtime::Handle;

use crate::dispatch::{Dispatcher, Immediate};
use crate::endpoint::Endpoints;
use crate::error::{ConfigError, NetworkError, Result};
use crate::reconcile::{ReconcileConfig, ReconcileReport, Reconciler};
use crate::transport::Transport;

/// Default remote document store.
pub const DEFAULT_BASE_URL: &str = "https://tasks-3f211.firebaseio.com/";

/// Configuration for the sync client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base address of the remote collection.
    pub base_url: String,
    /// Reconciliation behavior on fetch.
    pub reconcile: ReconcileConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Use a different remote.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Decode a collection response into representations.
///
/// The body is a JSON object of store-assigned keys to representations; the
/// keys carry no meaning and are dropped. Values come back in key order. A
/// JSON `null` body is an empty collection.
pub fn decode_collection(body: &[u8]) -> std::result::Result<Vec<TaskRepresentation>, serde_json::Error> {
    let collection: Option<BTreeMap<String, TaskRepresentation>> = serde_json::from_slice(body)?;
    Ok(collection
        .map(|c| c.into_values().collect())
        .unwrap_or_default())
}

/// Client for the remote task collection.
///
/// Cheap to clone; clones share the store, transport and reconciler.
pub struct SyncClient<S: TaskStore, T: Transport> {
    endpoints: Endpoints,
    transport: Arc<T>,
    reconciler: Arc<Reconciler<S>>,
    dispatcher: Arc<dyn Dispatcher>,
    runtime: Option<Handle>,
}

impl<S: TaskStore, T: Transport> Clone for SyncClient<S, T> {
    fn clone(&self) -> Self {
        Self {
            endpoints: self.endpoints.clone(),
            transport: Arc::clone(&self.transport),
            reconciler: Arc::clone(&self.reconciler),
            dispatcher: Arc::clone(&self.dispatcher),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S: TaskStore, T: Transport> SyncClient<S, T> {
    /// Create a client.
    ///
    /// Completions run inline until a dispatcher is set with
    /// [`with_dispatcher`](Self::with_dispatcher).
    pub fn new(store: Arc<S>, transport: T, config: SyncConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            endpoints: Endpoints::new(&config.base_url)?,
            transport: Arc::new(transport),
            reconciler: Arc::new(Reconciler::new(store, config.reconcile)),
            dispatcher: Arc::new(Immediate),
            runtime: None,
        })
    }

    /// Deliver callback completions through `dispatcher`.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Run callback-form operations on `runtime`.
    ///
    /// Without one, the runtime current at call time is used.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// The request addresses in use.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The local store.
    pub fn store(&self) -> &Arc<S> {
        self.reconciler.store()
    }

    /// PUT one task to `{base}/{identifier}.json`.
    pub async fn put_task(&self, task: &Task) -> Result<()> {
        let Some(identifier) = task.identifier else {
            return Err(NetworkError::NoIdentifier);
        };
        let url = self.endpoints.record(&identifier);

        let representation = task.representation().ok_or(NetworkError::NoRep)?;
        let body = serde_json::to_vec(&representation).map_err(|e| {
            tracing::error!("Error encoding task {}: {}", identifier, e);
            NetworkError::NoEncode(e.to_string())
        })?;

        self.transport.put(&url, body).await.map_err(|e| {
            tracing::error!("Error putting task to server: {}", e);
            NetworkError::OtherError(e.to_string())
        })?;

        tracing::debug!(%identifier, "task sent");
        Ok(())
    }

    /// GET the whole collection and reconcile it into the local store.
    pub async fn fetch_tasks_from_server(&self) -> Result<ReconcileReport> {
        let url = self.endpoints.collection();

        let body = self.transport.get(&url).await.map_err(|e| {
            tracing::error!("Error fetching tasks: {}", e);
            NetworkError::OtherError(e.to_string())
        })?;

        if body.is_empty() {
            tracing::error!("No data returned from fetch");
            return Err(NetworkError::NoData);
        }

        let representations = decode_collection(&body).map_err(|e| {
            tracing::error!("Error decoding task representations: {}", e);
            NetworkError::NoDecode(e.to_string())
        })?;

        self.reconciler
            .reconcile(&representations)
            .await
            .map_err(|e| {
                tracing::error!("Error merging fetched tasks: {}", e);
                NetworkError::NoDecode(format!("reconcile failed: {}", e))
            })
    }
}

impl<S, T> SyncClient<S, T>
where
    S: TaskStore + 'static,
    T: Transport + 'static,
{
    /// Callback form of [`put_task`](Self::put_task).
    ///
    /// A task without an identifier fails without touching the network.
    pub fn put<F>(&self, task: Task, completion: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        if task.identifier.is_none() {
            self.complete(completion, Err(NetworkError::NoIdentifier));
            return;
        }

        let client = self.clone();
        self.spawn(completion, async move { client.put_task(&task).await });
    }

    /// Callback form of [`fetch_tasks_from_server`](Self::fetch_tasks_from_server).
    pub fn fetch_tasks<F>(&self, completion: F)
    where
        F: FnOnce(Result<ReconcileReport>) + Send + 'static,
    {
        let client = self.clone();
        self.spawn(completion, async move { client.fetch_tasks_from_server().await });
    }

    fn spawn<R, F, Fut>(&self, completion: F, work: Fut)
    where
        R: Send + 'static,
        F: FnOnce(Result<R>) + Send + 'static,
        Fut: std::future::Future<Output = Result<R>> + Send + 'static,
    {
        let runtime = match self.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => handle,
            None => {
                tracing::error!("no async runtime available for sync operation");
                self.complete(
                    completion,
                    Err(NetworkError::OtherError("no async runtime available".into())),
                );
                return;
            }
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        runtime.spawn(async move {
            let result = work.await;
            dispatcher.dispatch(Box::new(move || completion(result)));
        });
    }

    fn complete<R, F>(&self, completion: F, result: Result<R>)
    where
        R: Send + 'static,
        F: FnOnce(Result<R>) + Send + 'static,
    {
        self.dispatcher.dispatch(Box::new(move || completion(result)));
    }
}
