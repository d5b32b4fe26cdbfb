//! # Tasks Testkit
//!
//! Testing utilities for task sync.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a local store wired to an in-memory remote, plus helpers
//!   for building tasks and remote payloads
//! - **Generators**: proptest strategies for tasks and representations,
//!   including malformed identifiers
//!
//! ## Test Fixtures
//!
//! ```rust
//! use tasks_testkit::fixtures::SyncFixture;
//!
//! # async fn example() {
//! let fixture = SyncFixture::new();
//! let task = fixture.remote_task("from the server").await;
//! let report = fixture.client.fetch_tasks_from_server().await.unwrap();
//! assert_eq!(report.created, 1);
//! # let _ = task;
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tasks_testkit::generators::representation_batch;
//!
//! proptest! {
//!     #[test]
//!     fn batch_is_nonempty(batch in representation_batch(1..8)) {
//!         prop_assert!(!batch.is_empty());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{representation, task_named, SyncFixture};
pub use generators::{representation_batch, task_representation, valid_task};
