//! In-memory implementation of the TaskStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tasks_core::Task;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::traits::{ChangeSet, SaveSummary, TaskStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    tasks: RwLock<BTreeMap<Uuid, Task>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store pre-populated with tasks.
    ///
    /// Tasks without an identifier are skipped.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks = tasks
            .into_iter()
            .filter_map(|t| t.identifier.map(|id| (id, t)))
            .collect();
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Uuid, Task>>> {
        self.tasks
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<Uuid, Task>>> {
        self.tasks
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn fetch_by_identifiers(&self, ids: &[Uuid]) -> Result<Vec<Task>> {
        let tasks = self.read()?;
        let wanted: BTreeSet<&Uuid> = ids.iter().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| tasks.get(id).cloned())
            .collect())
    }

    async fn get_task(&self, id: &Uuid) -> Result<Option<Task>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn all_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn save(&self, changes: ChangeSet) -> Result<SaveSummary> {
        changes.validate()?;

        let mut tasks = self.write()?;

        // Apply to a scratch copy so a failing batch leaves the store untouched.
        let mut staged = tasks.clone();
        let (inserts, updates, upserts) = changes.into_parts();
        let summary = SaveSummary {
            inserted: inserts.len(),
            updated: updates.len(),
            upserted: upserts.len(),
        };

        for task in inserts {
            let id = task.identifier.ok_or(StoreError::MissingIdentifier)?;
            if staged.contains_key(&id) {
                return Err(StoreError::Conflict(id));
            }
            staged.insert(id, task);
        }

        for task in updates {
            let id = task.identifier.ok_or(StoreError::MissingIdentifier)?;
            match staged.get_mut(&id) {
                Some(existing) => *existing = task,
                None => return Err(StoreError::NotFound(id)),
            }
        }

        for task in upserts {
            let id = task.identifier.ok_or(StoreError::MissingIdentifier)?;
            staged.insert(id, task);
        }

        *tasks = staged;
        Ok(summary)
    }

    async fn delete_task(&self, id: &Uuid) -> Result<bool> {
        Ok(self.write()?.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasks_core::TaskPriority;

    fn task(name: &str) -> Task {
        Task::new(name, None, TaskPriority::Normal)
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryStore::new();
        let t = task("groceries");
        let id = t.identifier.unwrap();

        let mut changes = ChangeSet::new();
        changes.insert(t.clone());
        let summary = store.save(changes).await.unwrap();
        assert_eq!(summary, SaveSummary { inserted: 1, updated: 0, upserted: 0 });

        assert_eq!(store.get_task(&id).await.unwrap(), Some(t));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_identifiers_skips_unknown() {
        let a = task("a");
        let b = task("b");
        let store = MemoryStore::with_tasks([a.clone(), b]);

        let found = store
            .fetch_by_identifiers(&[a.identifier.unwrap(), Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found, vec![a]);
    }

    #[tokio::test]
    async fn test_save_is_atomic() {
        let existing = task("existing");
        let store = MemoryStore::with_tasks([existing.clone()]);

        let mut changes = ChangeSet::new();
        changes.insert(task("fresh"));
        changes.insert(existing.clone());
        let err = store.save(changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if Some(id) == existing.identifier));

        // The first insert was not applied.
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_fails() {
        let store = MemoryStore::new();
        let mut changes = ChangeSet::new();
        changes.update(task("ghost"));
        assert!(matches!(
            store.save(changes).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upsert_writes_new_and_existing() {
        let mut existing = task("existing");
        let store = MemoryStore::with_tasks([existing.clone()]);

        existing.name = "renamed".into();
        let fresh = task("fresh");
        let mut changes = ChangeSet::new();
        changes.upsert(existing.clone());
        changes.upsert(fresh.clone());
        let summary = store.save(changes).await.unwrap();

        assert_eq!(summary.upserted, 2);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get_task(&existing.identifier.unwrap()).await.unwrap(), Some(existing));
        assert_eq!(store.get_task(&fresh.identifier.unwrap()).await.unwrap(), Some(fresh));
    }

    #[tokio::test]
    async fn test_delete() {
        let t = task("done");
        let id = t.identifier.unwrap();
        let store = MemoryStore::with_tasks([t]);

        assert!(store.delete_task(&id).await.unwrap());
        assert!(!store.delete_task(&id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
