//! # Tasks
//!
//! The unified API for a to-do list that syncs with a remote JSON document
//! store.
//!
//! ## Overview
//!
//! - **Tasks** live in a local store and are edited locally
//! - **Push** sends one task to the remote, keyed by its UUID
//! - **Pull** fetches the remote collection and merges it into the local
//!   store: existing tasks are updated, unknown ones are created
//!
//! Nothing is deleted remotely, and there is no conflict resolution: the
//! remote copy wins on pull.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tasks::{TaskController, TasksConfig, TaskPriority};
//!
//! async fn example() {
//!     let config = TasksConfig::default().with_database("tasks.db");
//!     let controller = TaskController::open(config).unwrap();
//!
//!     let task = controller
//!         .create_task("Buy milk", None, TaskPriority::Normal)
//!         .await
//!         .unwrap();
//!     controller.send_task(&task).await.unwrap();
//!
//!     let report = controller.sync().await.unwrap();
//!     println!("{} new, {} updated", report.created, report.updated);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `tasks::core` - Task and TaskRepresentation
//! - `tasks::store` - Storage abstraction and SQLite
//! - `tasks::sync` - Sync client, reconciliation, dispatch

pub mod config;
pub mod controller;
pub mod error;

// Re-export component crates
pub use tasks_core as core;
pub use tasks_store as store;
pub use tasks_sync as sync;

// Re-export main types for convenience
pub use config::{StoreLocation, TasksConfig};
pub use controller::TaskController;
pub use error::{Result, TaskError};

pub use tasks_core::{Task, TaskPriority, TaskRepresentation};
pub use tasks_sync::{NetworkError, ReconcileReport};
