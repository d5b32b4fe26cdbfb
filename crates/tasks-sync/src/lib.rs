//! # Tasks Sync
//!
//! Keeps the local task store in step with a remote JSON document store.
//!
//! ## Overview
//!
//! - **Push**: [`SyncClient::put_task`] writes one task to
//!   `{base}/{identifier}.json`.
//! - **Pull**: [`SyncClient::fetch_tasks_from_server`] reads `{base}.json`
//!   and hands the records to the [`Reconciler`], which updates local tasks
//!   that already exist and creates the rest in a single save.
//!
//! Failures are reported as a [`NetworkError`]. None are retried.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tasks_store::SqliteStore;
//! use tasks_sync::{main_queue, HttpConfig, HttpTransport, SyncClient, SyncConfig};
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("tasks.db").unwrap());
//!     let transport = HttpTransport::new(&HttpConfig::default()).unwrap();
//!     let (queue, mut main_loop) = main_queue();
//!
//!     let client = SyncClient::new(store, transport, SyncConfig::default())
//!         .unwrap()
//!         .with_dispatcher(Arc::new(queue));
//!
//!     client.fetch_tasks(|result| match result {
//!         Ok(report) => println!("created {}, updated {}", report.created, report.updated),
//!         Err(e) => eprintln!("sync did not complete: {}", e),
//!     });
//!
//!     // On the UI thread:
//!     main_loop.run_next().await;
//! }
//! ```
//!
//! ## Flow
//!
//! ```text
//! caller            runtime worker              remote          store
//!   |-- fetch_tasks -->|                           |                |
//!   |                  |-------- GET .json ------->|                |
//!   |                  |<------- {key: rep} -------|                |
//!   |                  |-- fetch_by_identifiers ------------------->|
//!   |                  |-- save(ChangeSet) ------------------------>|
//!   |<-- completion ---|  (via Dispatcher)                          |
//! ```

pub mod client;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod reconcile;
pub mod transport;

pub use client::{decode_collection, SyncClient, SyncConfig, DEFAULT_BASE_URL};
pub use dispatch::{main_queue, Dispatcher, Immediate, Job, MainLoop, MainQueue};
pub use endpoint::Endpoints;
pub use error::{ConfigError, NetworkError, Result, TransportError};
pub use reconcile::{QueryFailurePolicy, ReconcileConfig, ReconcileReport, Reconciler};
pub use transport::http::{HttpConfig, HttpTransport};
pub use transport::memory::MemoryTransport;
pub use transport::Transport;
