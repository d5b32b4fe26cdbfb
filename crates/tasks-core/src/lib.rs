//! # Tasks Core
//!
//! Pure types for the task sync layer: the locally persisted [`Task`] record
//! and its JSON wire form, [`TaskRepresentation`].
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`Task`] - A local to-do record, keyed by an optional UUID
//! - [`TaskRepresentation`] - The wire projection of a task, as stored remotely
//! - [`TaskPriority`] - The well-known priority values
//!
//! ## Mapping
//!
//! A task and its representation are joined by identifier. The representation
//! carries the identifier as a string; anything that does not parse as a UUID
//! is not a usable representation.
//!
//! ```rust
//! use tasks_core::{Task, TaskPriority};
//!
//! let task = Task::new("Buy milk", None, TaskPriority::High);
//! let rep = task.representation().unwrap();
//! assert_eq!(rep.uuid(), task.identifier);
//! ```

pub mod error;
pub mod priority;
pub mod representation;
pub mod task;

pub use error::CoreError;
pub use priority::TaskPriority;
pub use representation::TaskRepresentation;
pub use task::Task;

/// Re-exported so downstream crates agree on the identifier type.
pub use uuid::Uuid;
