//! SQLite implementation of the TaskStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tasks_core::Task;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{ChangeSet, SaveSummary, TaskStore};

/// Identifiers per `IN (...)` query, well under SQLite's host parameter limit.
const FETCH_CHUNK: usize = 500;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }
}

const SELECT_COLUMNS: &str = "SELECT identifier, name, notes, complete, priority FROM tasks";

// Helper to convert a row to Task
fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let identifier: String = row.get("identifier")?;
    let identifier = Uuid::parse_str(&identifier).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Task {
        identifier: Some(identifier),
        name: row.get("name")?,
        notes: row.get("notes")?,
        complete: row.get("complete")?,
        priority: row.get("priority")?,
    })
}

fn query_tasks(conn: &Connection, sql: &str, args: &[String]) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let tasks = stmt
        .query_map(params_from_iter(args.iter()), row_to_task)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn fetch_by_identifiers(&self, ids: &[Uuid]) -> Result<Vec<Task>> {
        let mut keys: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        keys.sort();
        keys.dedup();

        self.blocking(move |conn| {
            let mut tasks = Vec::with_capacity(keys.len());
            for chunk in keys.chunks(FETCH_CHUNK) {
                let placeholders = vec!["?"; chunk.len()].join(", ");
                let sql = format!(
                    "{} WHERE identifier IN ({}) ORDER BY identifier",
                    SELECT_COLUMNS, placeholders
                );
                tasks.extend(query_tasks(conn, &sql, chunk)?);
            }
            Ok(tasks)
        })
        .await
    }

    async fn get_task(&self, id: &Uuid) -> Result<Option<Task>> {
        let key = id.to_string();

        self.blocking(move |conn| {
            let sql = format!("{} WHERE identifier = ?1", SELECT_COLUMNS);
            Ok(conn.query_row(&sql, params![key], row_to_task).optional()?)
        })
        .await
    }

    async fn all_tasks(&self) -> Result<Vec<Task>> {
        self.blocking(|conn| {
            let sql = format!("{} ORDER BY identifier", SELECT_COLUMNS);
            query_tasks(conn, &sql, &[])
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.blocking(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
            usize::try_from(n).map_err(|_| StoreError::InvalidData(format!("task count {}", n)))
        })
        .await
    }

    async fn save(&self, changes: ChangeSet) -> Result<SaveSummary> {
        changes.validate()?;

        self.blocking(move |conn| {
            let now = now_millis();
            let (inserts, updates, upserts) = changes.into_parts();
            let summary = SaveSummary {
                inserted: inserts.len(),
                updated: updates.len(),
                upserted: upserts.len(),
            };

            // Dropping the transaction on an early return rolls it back.
            let tx = conn.transaction()?;

            for task in &inserts {
                let id = task.identifier.ok_or(StoreError::MissingIdentifier)?;
                let changed = tx.execute(
                    "INSERT OR IGNORE INTO tasks
                        (identifier, name, notes, complete, priority, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                    params![
                        id.to_string(),
                        task.name,
                        task.notes,
                        task.complete,
                        task.priority,
                        now,
                    ],
                )?;
                if changed == 0 {
                    return Err(StoreError::Conflict(id));
                }
            }

            for task in &updates {
                let id = task.identifier.ok_or(StoreError::MissingIdentifier)?;
                let changed = tx.execute(
                    "UPDATE tasks
                     SET name = ?2, notes = ?3, complete = ?4, priority = ?5, updated_at = ?6
                     WHERE identifier = ?1",
                    params![
                        id.to_string(),
                        task.name,
                        task.notes,
                        task.complete,
                        task.priority,
                        now,
                    ],
                )?;
                if changed == 0 {
                    return Err(StoreError::NotFound(id));
                }
            }

            for task in &upserts {
                let id = task.identifier.ok_or(StoreError::MissingIdentifier)?;
                tx.execute(
                    "INSERT INTO tasks
                        (identifier, name, notes, complete, priority, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                     ON CONFLICT(identifier) DO UPDATE SET
                        name = excluded.name,
                        notes = excluded.notes,
                        complete = excluded.complete,
                        priority = excluded.priority,
                        updated_at = excluded.updated_at",
                    params![
                        id.to_string(),
                        task.name,
                        task.notes,
                        task.complete,
                        task.priority,
                        now,
                    ],
                )?;
            }

            tx.commit()?;
            tracing::debug!(
                inserted = summary.inserted,
                updated = summary.updated,
                upserted = summary.upserted,
                "saved task changes"
            );
            Ok(summary)
        })
        .await
    }

    async fn delete_task(&self, id: &Uuid) -> Result<bool> {
        let key = id.to_string();

        self.blocking(move |conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE identifier = ?1", params![key])?;
            Ok(changed > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasks_core::TaskPriority;

    fn task(name: &str) -> Task {
        Task::new(name, Some(format!("notes for {}", name)), TaskPriority::High)
    }

    #[tokio::test]
    async fn test_sqlite_store_roundtrip() {
        let store = SqliteStore::open_memory().unwrap();
        let t = task("laundry");
        let id = t.identifier.unwrap();

        let mut changes = ChangeSet::new();
        changes.insert(t.clone());
        store.save(changes).await.unwrap();

        assert_eq!(store.get_task(&id).await.unwrap(), Some(t));
        assert_eq!(store.get_task(&Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sqlite_update_in_place() {
        let store = SqliteStore::open_memory().unwrap();
        let mut t = task("call mom");

        let mut changes = ChangeSet::new();
        changes.insert(t.clone());
        store.save(changes).await.unwrap();

        t.complete = true;
        t.notes = None;
        let mut changes = ChangeSet::new();
        changes.update(t.clone());
        let summary = store.save(changes).await.unwrap();

        assert_eq!(summary, SaveSummary { inserted: 0, updated: 1, upserted: 0 });
        assert_eq!(store.all_tasks().await.unwrap(), vec![t]);
    }

    #[tokio::test]
    async fn test_sqlite_save_rolls_back() {
        let store = SqliteStore::open_memory().unwrap();
        let existing = task("existing");

        let mut changes = ChangeSet::new();
        changes.insert(existing.clone());
        store.save(changes).await.unwrap();

        let mut changes = ChangeSet::new();
        changes.insert(task("fresh"));
        changes.update(task("never stored"));
        assert!(matches!(
            store.save(changes).await,
            Err(StoreError::NotFound(_))
        ));

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_upsert_writes_new_and_existing() {
        let store = SqliteStore::open_memory().unwrap();
        let mut existing = task("existing");

        let mut changes = ChangeSet::new();
        changes.insert(existing.clone());
        store.save(changes).await.unwrap();

        existing.complete = true;
        existing.notes = None;
        let fresh = task("fresh");
        let mut changes = ChangeSet::new();
        changes.upsert(existing.clone());
        changes.upsert(fresh.clone());
        let summary = store.save(changes).await.unwrap();

        assert_eq!(summary, SaveSummary { inserted: 0, updated: 0, upserted: 2 });
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.get_task(&existing.identifier.unwrap()).await.unwrap(), Some(existing));
        assert_eq!(store.get_task(&fresh.identifier.unwrap()).await.unwrap(), Some(fresh));
    }

    #[tokio::test]
    async fn test_sqlite_fetch_by_identifiers() {
        let store = SqliteStore::open_memory().unwrap();
        let tasks: Vec<Task> = (0..5).map(|i| task(&format!("task {}", i))).collect();

        let mut changes = ChangeSet::new();
        for t in &tasks {
            changes.insert(t.clone());
        }
        store.save(changes).await.unwrap();

        let wanted = [
            tasks[1].identifier.unwrap(),
            tasks[3].identifier.unwrap(),
            tasks[3].identifier.unwrap(),
            Uuid::new_v4(),
        ];
        let found = store.fetch_by_identifiers(&wanted).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&tasks[1]));
        assert!(found.contains(&tasks[3]));

        assert!(store.fetch_by_identifiers(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        let t = task("persist me");

        {
            let store = SqliteStore::open(&path).unwrap();
            let mut changes = ChangeSet::new();
            changes.insert(t.clone());
            store.save(changes).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.all_tasks().await.unwrap(), vec![t.clone()]);
        assert!(store.delete_task(&t.identifier.unwrap()).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
