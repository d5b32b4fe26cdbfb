//! The local task record.

use uuid::Uuid;

use crate::priority::TaskPriority;
use crate::representation::{format_identifier, TaskRepresentation};

/// A locally persisted to-do item.
///
/// The identifier is optional until assigned. Tasks created through
/// [`Task::new`] always get one; records loaded from older data may not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub identifier: Option<Uuid>,
    pub name: String,
    pub notes: Option<String>,
    pub complete: bool,
    pub priority: String,
}

impl Task {
    /// Create a new, incomplete task with a fresh identifier.
    pub fn new(name: impl Into<String>, notes: Option<String>, priority: TaskPriority) -> Self {
        Self {
            identifier: Some(Uuid::new_v4()),
            name: name.into(),
            notes,
            complete: false,
            priority: priority.into(),
        }
    }

    /// Build a local record from its wire form.
    ///
    /// Returns `None` if the representation's identifier is not a UUID.
    pub fn from_representation(rep: &TaskRepresentation) -> Option<Self> {
        let identifier = rep.uuid()?;
        Some(Self {
            identifier: Some(identifier),
            name: rep.name.clone(),
            notes: rep.notes.clone(),
            complete: rep.complete,
            priority: rep.priority.clone(),
        })
    }

    /// Overwrite the mutable fields from a representation.
    ///
    /// The identifier is left alone.
    pub fn apply(&mut self, rep: &TaskRepresentation) {
        self.name.clone_from(&rep.name);
        self.notes.clone_from(&rep.notes);
        self.complete = rep.complete;
        self.priority.clone_from(&rep.priority);
    }

    /// The wire form of this task.
    ///
    /// A task without an identifier or without a name has no representation.
    pub fn representation(&self) -> Option<TaskRepresentation> {
        let identifier = self.identifier.as_ref()?;
        if self.name.trim().is_empty() {
            return None;
        }
        Some(TaskRepresentation {
            complete: self.complete,
            identifier: format_identifier(identifier),
            name: self.name.clone(),
            notes: self.notes.clone(),
            priority: self.priority.clone(),
        })
    }

    /// The priority as a known value, if it is one.
    pub fn known_priority(&self) -> Option<TaskPriority> {
        self.priority.parse().ok()
    }
}
