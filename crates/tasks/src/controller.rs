//! The TaskController: unified API for the task list.
//!
//! Brings together the local store and the sync client: the app creates,
//! edits and deletes tasks locally, pushes individual tasks, and pulls the
//! remote collection.

use std::sync::Arc;

use tasks_core::{Task, TaskPriority};
use tasks_store::{ChangeSet, SqliteStore, StoreError, TaskStore};
use tasks_sync::{
    Dispatcher, HttpTransport, ReconcileReport, SyncClient, SyncConfig, Transport,
};
use uuid::Uuid;

use crate::config::{StoreLocation, TasksConfig};
use crate::error::{Result, TaskError};

/// The main controller.
///
/// Provides a unified API for:
/// - Creating, editing and deleting local tasks
/// - Querying local tasks
/// - Pushing tasks to and pulling tasks from the remote
pub struct TaskController<S: TaskStore, T: Transport> {
    store: Arc<S>,
    sync: SyncClient<S, T>,
}

impl TaskController<SqliteStore, HttpTransport> {
    /// Open a SQLite-backed controller that syncs over HTTP.
    pub fn open(config: TasksConfig) -> Result<Self> {
        let store = match &config.store {
            StoreLocation::Memory => SqliteStore::open_memory()?,
            StoreLocation::File(path) => SqliteStore::open(path)?,
        };
        let transport = HttpTransport::new(&config.http)?;
        tracing::info!(base_url = %config.sync.base_url, "opened task controller");
        Self::new(store, transport, config.sync)
    }
}

impl<S: TaskStore + 'static, T: Transport + 'static> TaskController<S, T> {
    /// Create a controller over an existing store and transport.
    pub fn new(store: S, transport: T, config: SyncConfig) -> Result<Self> {
        let store = Arc::new(store);
        let sync = SyncClient::new(Arc::clone(&store), transport, config)?;
        Ok(Self { store, sync })
    }

    /// Deliver sync callbacks through `dispatcher`.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.sync = self.sync.with_dispatcher(dispatcher);
        self
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The sync client, for callback-style calls.
    pub fn sync_client(&self) -> &SyncClient<S, T> {
        &self.sync
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Local Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// All local tasks.
    pub async fn tasks(&self) -> Result<Vec<Task>> {
        Ok(self.store.all_tasks().await?)
    }

    /// One local task.
    pub async fn task(&self, id: &Uuid) -> Result<Task> {
        self.store
            .get_task(id)
            .await?
            .ok_or(TaskError::NotFound(*id))
    }

    /// Create and store a new task.
    pub async fn create_task(
        &self,
        name: &str,
        notes: Option<String>,
        priority: TaskPriority,
    ) -> Result<Task> {
        if name.trim().is_empty() {
            return Err(TaskError::InvalidTask("name is empty".into()));
        }

        let task = Task::new(name, notes, priority);
        let mut changes = ChangeSet::new();
        changes.insert(task.clone());
        self.store.save(changes).await?;

        tracing::debug!(identifier = ?task.identifier, "created task");
        Ok(task)
    }

    /// Store edits to an existing task.
    pub async fn update_task(&self, task: Task) -> Result<()> {
        let Some(id) = task.identifier else {
            return Err(TaskError::InvalidTask("task has no identifier".into()));
        };

        let mut changes = ChangeSet::new();
        changes.update(task);
        match self.store.save(changes).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(TaskError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Mark a task complete or not.
    pub async fn set_complete(&self, id: &Uuid, complete: bool) -> Result<Task> {
        let mut task = self.task(id).await?;
        task.complete = complete;
        self.update_task(task.clone()).await?;
        Ok(task)
    }

    /// Delete a local task. The remote copy is left alone.
    pub async fn delete_task(&self, id: &Uuid) -> Result<()> {
        if self.store.delete_task(id).await? {
            tracing::debug!(identifier = %id, "deleted task");
            Ok(())
        } else {
            Err(TaskError::NotFound(*id))
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sync Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Push one task to the remote.
    pub async fn send_task(&self, task: &Task) -> Result<()> {
        Ok(self.sync.put_task(task).await?)
    }

    /// Pull the remote collection into the local store.
    pub async fn sync(&self) -> Result<ReconcileReport> {
        Ok(self.sync.fetch_tasks_from_server().await?)
    }
}
