//! # Tasks Store
//!
//! Storage abstraction for local task records. Provides a trait-based
//! interface with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The sync layer never talks to a database directly. It works against the
//! [`TaskStore`] trait, which is injected by the caller, so the same
//! reconciliation code runs on top of [`SqliteStore`] in the app and
//! [`MemoryStore`] in tests.
//!
//! Writes go through a [`ChangeSet`]: callers stage inserts and updates and
//! commit them with a single [`TaskStore::save`]. A save either applies the
//! whole change set or none of it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasks_core::{Task, TaskPriority};
//! use tasks_store::{ChangeSet, SqliteStore, TaskStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("tasks.db").unwrap();
//!
//!     let mut changes = ChangeSet::new();
//!     changes.insert(Task::new("Buy milk", None, TaskPriority::Normal));
//!     let summary = store.save(changes).await.unwrap();
//!     assert_eq!(summary.inserted, 1);
//! }
//! ```

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ChangeSet, SaveSummary, TaskStore};
