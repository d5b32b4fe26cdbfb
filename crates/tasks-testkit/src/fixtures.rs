//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use serde_json::Value;
use tasks_core::representation::format_identifier;
use tasks_core::{Task, TaskPriority, TaskRepresentation};
use tasks_store::{MemoryStore, TaskStore};
use tasks_sync::{MemoryTransport, SyncClient, SyncConfig};
use uuid::Uuid;

/// Base URL used by fixtures.
pub const FIXTURE_BASE_URL: &str = "https://tasks.test/";

/// A sync client over a memory store and an in-memory remote.
pub struct SyncFixture {
    pub store: Arc<MemoryStore>,
    pub remote: Arc<MemoryTransport>,
    pub client: SyncClient<MemoryStore, Arc<MemoryTransport>>,
    next_key: std::sync::atomic::AtomicU64,
}

impl SyncFixture {
    /// Create a fixture with an empty store and remote.
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Create a fixture over a pre-populated store.
    pub fn with_store(store: MemoryStore) -> Self {
        Self::with_config(store, SyncConfig::default().with_base_url(FIXTURE_BASE_URL))
    }

    /// Create a fixture with custom sync configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configured base URL is invalid.
    pub fn with_config(store: MemoryStore, config: SyncConfig) -> Self {
        let store = Arc::new(store);
        let remote = MemoryTransport::new();
        let client = SyncClient::new(Arc::clone(&store), Arc::clone(&remote), config)
            .expect("fixture sync config must be valid");
        Self {
            store,
            remote,
            client,
            next_key: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// A fresh store-assigned style key, sorting after all previous ones.
    pub fn next_key(&self) -> String {
        let n = self
            .next_key
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        format!("-K{:08}", n)
    }

    /// Put a new task on the remote only and return it.
    pub async fn remote_task(&self, name: &str) -> Task {
        let task = task_named(name);
        self.push_remote(&representation(&task)).await;
        task
    }

    /// Put a representation on the remote under a fresh key.
    pub async fn push_remote(&self, rep: &TaskRepresentation) {
        self.remote.seed(&self.next_key(), rep).await;
    }

    /// Put an arbitrary JSON document on the remote under a fresh key.
    pub async fn push_remote_raw(&self, value: Value) {
        self.remote.seed_raw(&self.next_key(), value).await;
    }

    /// All local tasks.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be read.
    pub async fn local_tasks(&self) -> Vec<Task> {
        self.store.all_tasks().await.expect("memory store read")
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A normal-priority task with a fresh identifier.
pub fn task_named(name: &str) -> Task {
    Task::new(name, None, TaskPriority::Normal)
}

/// The representation of a task.
///
/// # Panics
///
/// Panics if the task has no representation.
pub fn representation(task: &Task) -> TaskRepresentation {
    task.representation()
        .expect("fixture task must be representable")
}

/// A representation with a fresh identifier.
pub fn new_representation(name: &str, priority: TaskPriority) -> TaskRepresentation {
    TaskRepresentation {
        complete: false,
        identifier: format_identifier(&Uuid::new_v4()),
        name: name.to_string(),
        notes: None,
        priority: priority.to_string(),
    }
}
