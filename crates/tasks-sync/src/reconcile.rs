//! Reconciliation of a remote batch into the local store.
//!
//! Remote records are matched to local ones by identifier. Matches are
//! updated in place, the rest are created, and everything is committed in
//! one save.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tasks_core::{Task, TaskRepresentation};
use tasks_store::{ChangeSet, Result, TaskStore};
use tokio::sync::Mutex;
use uuid::Uuid;

/// What to do when looking up existing local tasks fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryFailurePolicy {
    /// Log and stop. Nothing is created and nothing is saved.
    #[default]
    Abort,
    /// Log and carry on as if no local task matched. Every valid remote
    /// record is written as an upsert and counted as created.
    Proceed,
}

/// Configuration for reconciliation.
#[derive(Debug, Clone, Default)]
pub struct ReconcileConfig {
    pub on_query_failure: QueryFailurePolicy,
}

/// Result of a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Local tasks created from remote records.
    pub created: usize,
    /// Local tasks whose fields changed.
    pub updated: usize,
    /// Local tasks that matched a remote record with identical fields.
    pub unchanged: usize,
    /// Remote identifiers that were not UUIDs, in input order.
    pub skipped: Vec<String>,
    /// Remote records shadowed by a later record with the same identifier.
    pub duplicates: usize,
}

impl ReconcileReport {
    /// Total local writes performed.
    pub fn changed(&self) -> usize {
        self.created + self.updated
    }
}

/// Merges remote task representations into a local store.
pub struct Reconciler<S: TaskStore> {
    store: Arc<S>,
    config: ReconcileConfig,
    /// Held for the whole pass so overlapping fetches cannot interleave
    /// their lookups and saves.
    pass: Mutex<()>,
}

impl<S: TaskStore> Reconciler<S> {
    /// Create a reconciler over a store.
    pub fn new(store: Arc<S>, config: ReconcileConfig) -> Self {
        Self {
            store,
            config,
            pass: Mutex::new(()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Merge `representations` into the store.
    ///
    /// Representations whose identifier is not a UUID are skipped and listed
    /// in the report. When an identifier appears more than once, the last
    /// occurrence wins.
    pub async fn reconcile(&self, representations: &[TaskRepresentation]) -> Result<ReconcileReport> {
        let _pass = self.pass.lock().await;
        let mut report = ReconcileReport::default();

        // Keyed by identifier; `order` keeps first-seen order for creation.
        let mut by_id: HashMap<Uuid, &TaskRepresentation> = HashMap::new();
        let mut order: Vec<Uuid> = Vec::new();

        for rep in representations {
            match rep.uuid() {
                Some(id) => {
                    if by_id.insert(id, rep).is_some() {
                        report.duplicates += 1;
                    } else {
                        order.push(id);
                    }
                }
                None => {
                    tracing::warn!(identifier = %rep.identifier, "skipping task with malformed identifier");
                    report.skipped.push(rep.identifier.clone());
                }
            }
        }

        let mut lookup_failed = false;
        let existing = match self.store.fetch_by_identifiers(&order).await {
            Ok(tasks) => tasks,
            Err(e) => match self.config.on_query_failure {
                QueryFailurePolicy::Abort => {
                    tracing::error!("Error fetching tasks for reconciliation: {}", e);
                    return Err(e);
                }
                QueryFailurePolicy::Proceed => {
                    tracing::warn!("Error fetching tasks for reconciliation, upserting all: {}", e);
                    lookup_failed = true;
                    Vec::new()
                }
            },
        };

        let mut to_create: HashSet<Uuid> = order.iter().copied().collect();
        let mut changes = ChangeSet::new();

        for mut task in existing {
            let Some(id) = task.identifier else { continue };
            let Some(rep) = by_id.get(&id) else { continue };

            let before = task.clone();
            task.apply(rep);
            if task == before {
                report.unchanged += 1;
            } else {
                changes.update(task);
                report.updated += 1;
            }
            to_create.remove(&id);
        }

        for id in order.iter().filter(|id| to_create.contains(id)) {
            if let Some(task) = by_id.get(id).and_then(|rep| Task::from_representation(rep)) {
                // Without the lookup some of these may already exist locally.
                if lookup_failed {
                    changes.upsert(task);
                } else {
                    changes.insert(task);
                }
                report.created += 1;
            }
        }

        self.store.save(changes).await?;

        tracing::info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped.len(),
            duplicates = report.duplicates,
            "reconciled remote tasks"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tasks_core::representation::format_identifier;
    use tasks_core::TaskPriority;
    use tasks_store::{MemoryStore, SaveSummary, StoreError};

    fn rep_for(task: &Task) -> TaskRepresentation {
        task.representation().unwrap()
    }

    fn remote(name: &str) -> TaskRepresentation {
        TaskRepresentation {
            complete: false,
            identifier: format_identifier(&Uuid::new_v4()),
            name: name.to_string(),
            notes: Some("from the server".into()),
            priority: "high".into(),
        }
    }

    /// Wraps a MemoryStore, failing lookups or saves on demand and counting saves.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_fetch: AtomicBool,
        fail_save: AtomicBool,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl TaskStore for FlakyStore {
        async fn fetch_by_identifiers(&self, ids: &[Uuid]) -> Result<Vec<Task>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(StoreError::InvalidData("fetch failed".into()));
            }
            self.inner.fetch_by_identifiers(ids).await
        }

        async fn get_task(&self, id: &Uuid) -> Result<Option<Task>> {
            self.inner.get_task(id).await
        }

        async fn all_tasks(&self) -> Result<Vec<Task>> {
            self.inner.all_tasks().await
        }

        async fn count(&self) -> Result<usize> {
            self.inner.count().await
        }

        async fn save(&self, changes: ChangeSet) -> Result<SaveSummary> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_save.load(Ordering::SeqCst) {
                return Err(StoreError::InvalidData("save failed".into()));
            }
            self.inner.save(changes).await
        }

        async fn delete_task(&self, id: &Uuid) -> Result<bool> {
            self.inner.delete_task(id).await
        }
    }

    fn reconciler(store: FlakyStore) -> Reconciler<FlakyStore> {
        Reconciler::new(Arc::new(store), ReconcileConfig::default())
    }

    #[tokio::test]
    async fn test_updates_existing_in_place() {
        let local = Task::new("old name", None, TaskPriority::Normal);
        let r = reconciler(FlakyStore {
            inner: MemoryStore::with_tasks([local.clone()]),
            ..Default::default()
        });

        let mut rep = rep_for(&local);
        rep.name = "new name".into();

        let report = r.reconcile(&[rep]).await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 0);

        let all = r.store().all_tasks().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].identifier, local.identifier);
        assert_eq!(all[0].name, "new name");
    }

    #[tokio::test]
    async fn test_creates_missing() {
        let r = reconciler(FlakyStore::default());
        let rep = remote("fresh");

        let report = r.reconcile(&[rep.clone()]).await.unwrap();
        assert_eq!(report.created, 1);

        let all = r.store().all_tasks().await.unwrap();
        assert_eq!(all, vec![Task::from_representation(&rep).unwrap()]);
    }

    #[tokio::test]
    async fn test_malformed_identifier_is_ignored() {
        let local = Task::new("keep", None, TaskPriority::Normal);
        let r = reconciler(FlakyStore {
            inner: MemoryStore::with_tasks([local.clone()]),
            ..Default::default()
        });

        let mut bad = remote("bad");
        bad.identifier = "task-42".into();

        let report = r.reconcile(&[bad]).await.unwrap();
        assert_eq!(report.skipped, vec!["task-42".to_string()]);
        assert_eq!(report.changed(), 0);
        assert_eq!(r.store().all_tasks().await.unwrap(), vec![local]);
    }

    #[tokio::test]
    async fn test_malformed_does_not_shift_pairing() {
        let r = reconciler(FlakyStore::default());
        let mut bad = remote("bad");
        bad.identifier = "nope".into();
        let good = remote("good");

        r.reconcile(&[bad, good.clone()]).await.unwrap();

        let id = good.uuid().unwrap();
        let stored = r.store().get_task(&id).await.unwrap().unwrap();
        assert_eq!(stored.name, "good");
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop_save() {
        let r = reconciler(FlakyStore::default());

        let report = r.reconcile(&[]).await.unwrap();
        assert_eq!(report, ReconcileReport::default());
        assert_eq!(r.store().saves.load(Ordering::SeqCst), 1);
        assert_eq!(r.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_identifier_last_wins() {
        let r = reconciler(FlakyStore::default());
        let first = remote("first");
        let mut second = first.clone();
        second.name = "second".into();

        let report = r.reconcile(&[first.clone(), second]).await.unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.duplicates, 1);

        let stored = r.store().get_task(&first.uuid().unwrap()).await.unwrap();
        assert_eq!(stored.unwrap().name, "second");
    }

    #[tokio::test]
    async fn test_unchanged_is_not_rewritten() {
        let local = Task::new("same", None, TaskPriority::Low);
        let r = reconciler(FlakyStore {
            inner: MemoryStore::with_tasks([local.clone()]),
            ..Default::default()
        });

        let report = r.reconcile(&[rep_for(&local)]).await.unwrap();
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.changed(), 0);
    }

    #[tokio::test]
    async fn test_query_failure_aborts_by_default() {
        let r = reconciler(FlakyStore {
            fail_fetch: AtomicBool::new(true),
            ..Default::default()
        });

        assert!(r.reconcile(&[remote("x")]).await.is_err());
        assert_eq!(r.store().saves.load(Ordering::SeqCst), 0);
        assert_eq!(r.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_query_failure_can_proceed() {
        let store = FlakyStore {
            fail_fetch: AtomicBool::new(true),
            ..Default::default()
        };
        let r = Reconciler::new(
            Arc::new(store),
            ReconcileConfig {
                on_query_failure: QueryFailurePolicy::Proceed,
            },
        );

        let report = r.reconcile(&[remote("x"), remote("y")]).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(r.store().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_failure_proceed_keeps_existing_and_creates_new() {
        let local = Task::new("already here", None, TaskPriority::Normal);
        let store = FlakyStore {
            inner: MemoryStore::with_tasks([local.clone()]),
            fail_fetch: AtomicBool::new(true),
            ..Default::default()
        };
        let r = Reconciler::new(
            Arc::new(store),
            ReconcileConfig {
                on_query_failure: QueryFailurePolicy::Proceed,
            },
        );

        let mut changed = rep_for(&local);
        changed.name = "renamed remotely".into();
        let fresh = remote("brand new");

        let report = r.reconcile(&[changed, fresh.clone()]).await.unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(r.store().count().await.unwrap(), 2);

        let kept = r.store().get_task(&local.identifier.unwrap()).await.unwrap();
        assert_eq!(kept.unwrap().name, "renamed remotely");
        let created = r.store().get_task(&fresh.uuid().unwrap()).await.unwrap();
        assert_eq!(created.unwrap().name, "brand new");
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let r = reconciler(FlakyStore {
            fail_save: AtomicBool::new(true),
            ..Default::default()
        });

        let err = r.reconcile(&[remote("x")]).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
        assert_eq!(r.store().count().await.unwrap(), 0);
    }
}
