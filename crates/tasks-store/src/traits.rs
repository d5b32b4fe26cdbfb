//! TaskStore trait: the abstract interface for local task persistence.
//!
//! This trait keeps the sync layer storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use tasks_core::Task;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// A batch of staged writes, committed with [`TaskStore::save`].
///
/// Staging is infallible; validation happens when the batch is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    inserts: Vec<Task>,
    updates: Vec<Task>,
    upserts: Vec<Task>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a new record.
    pub fn insert(&mut self, task: Task) {
        self.inserts.push(task);
    }

    /// Stage a modified existing record.
    pub fn update(&mut self, task: Task) {
        self.updates.push(task);
    }

    /// Stage a record that is written whether or not it already exists.
    pub fn upsert(&mut self, task: Task) {
        self.upserts.push(task);
    }

    /// Staged inserts, in staging order.
    pub fn inserts(&self) -> &[Task] {
        &self.inserts
    }

    /// Staged updates, in staging order.
    pub fn updates(&self) -> &[Task] {
        &self.updates
    }

    /// Staged upserts, in staging order.
    pub fn upserts(&self) -> &[Task] {
        &self.upserts
    }

    /// True if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of staged writes.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.upserts.len()
    }

    /// Split into `(inserts, updates, upserts)`.
    pub fn into_parts(self) -> (Vec<Task>, Vec<Task>, Vec<Task>) {
        (self.inserts, self.updates, self.upserts)
    }

    /// Check that every staged task can be keyed.
    pub(crate) fn validate(&self) -> Result<()> {
        if self
            .inserts
            .iter()
            .chain(self.updates.iter())
            .chain(self.upserts.iter())
            .any(|t| t.identifier.is_none())
        {
            return Err(StoreError::MissingIdentifier);
        }
        Ok(())
    }
}

/// What a successful save wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub upserted: usize,
}

/// The TaskStore trait: async interface for local task persistence.
///
/// All methods are async so that blocking backends can move their work off
/// the runtime (SQLite uses `spawn_blocking`).
///
/// # Design Notes
///
/// - **Keyed by identifier**: tasks without an identifier cannot be stored.
/// - **Atomic saves**: [`TaskStore::save`] applies a whole [`ChangeSet`] or
///   nothing. Inserting an existing identifier or updating a missing one
///   fails the entire batch. Upserts never conflict.
/// - **Single writer**: the store is safe to share, but callers that read,
///   modify and save must serialize among themselves.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch all tasks whose identifier is in `ids`.
    ///
    /// Identifiers with no stored task are skipped. Order is unspecified.
    async fn fetch_by_identifiers(&self, ids: &[Uuid]) -> Result<Vec<Task>>;

    /// Get a single task.
    async fn get_task(&self, id: &Uuid) -> Result<Option<Task>>;

    /// All stored tasks, ordered by identifier.
    async fn all_tasks(&self) -> Result<Vec<Task>>;

    /// Number of stored tasks.
    async fn count(&self) -> Result<usize>;

    /// Commit a change set atomically.
    async fn save(&self, changes: ChangeSet) -> Result<SaveSummary>;

    /// Delete a task. Returns whether it existed.
    async fn delete_task(&self, id: &Uuid) -> Result<bool>;
}

#[async_trait]
impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    async fn fetch_by_identifiers(&self, ids: &[Uuid]) -> Result<Vec<Task>> {
        (**self).fetch_by_identifiers(ids).await
    }

    async fn get_task(&self, id: &Uuid) -> Result<Option<Task>> {
        (**self).get_task(id).await
    }

    async fn all_tasks(&self) -> Result<Vec<Task>> {
        (**self).all_tasks().await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }

    async fn save(&self, changes: ChangeSet) -> Result<SaveSummary> {
        (**self).save(changes).await
    }

    async fn delete_task(&self, id: &Uuid) -> Result<bool> {
        (**self).delete_task(id).await
    }
}
