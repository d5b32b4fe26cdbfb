//! Proptest generators for property-based testing.

use proptest::prelude::*;

use tasks_core::representation::format_identifier;
use tasks_core::{Task, TaskPriority, TaskRepresentation};
use uuid::Uuid;

/// Generate a random UUID.
pub fn uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Generate a known priority.
pub fn priority() -> impl Strategy<Value = TaskPriority> {
    prop::sample::select(TaskPriority::ALL.to_vec())
}

/// Generate a priority string, usually a known one.
pub fn priority_string() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => priority().prop_map(String::from),
        1 => "[a-z]{1,12}",
    ]
}

/// Generate a non-blank task name.
pub fn name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.!?'-]{0,47}".prop_map(String::from)
}

/// Generate optional notes.
pub fn notes() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[ -~]{0,120}")
}

/// Generate a task that has a representation.
pub fn valid_task() -> impl Strategy<Value = Task> {
    (uuid(), name(), notes(), any::<bool>(), priority_string()).prop_map(
        |(id, name, notes, complete, priority)| Task {
            identifier: Some(id),
            name,
            notes,
            complete,
            priority,
        },
    )
}

/// Generate an identifier string that is not a UUID.
pub fn malformed_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z0-9-]{1,35}",
        uuid().prop_map(|id| id.simple().to_string()),
        uuid().prop_map(|id| format!("{{{}}}", id)),
    ]
}

/// Generate a representation; about one in five has a malformed identifier.
pub fn task_representation() -> impl Strategy<Value = TaskRepresentation> {
    let identifier = prop_oneof![
        4 => uuid().prop_map(|id| format_identifier(&id)),
        1 => malformed_identifier(),
    ];
    (identifier, name(), notes(), any::<bool>(), priority_string()).prop_map(
        |(identifier, name, notes, complete, priority)| TaskRepresentation {
            complete,
            identifier,
            name,
            notes,
            priority,
        },
    )
}

/// Generate a batch of representations that may repeat identifiers.
pub fn representation_batch(
    size: impl Into<prop::collection::SizeRange>,
) -> impl Strategy<Value = Vec<TaskRepresentation>> {
    prop::collection::vec(task_representation(), size)
        .prop_flat_map(|batch| {
            let len = batch.len();
            (Just(batch), prop::collection::vec((0..len.max(1), 0..len.max(1)), 0..=len / 2))
        })
        .prop_map(|(mut batch, copies)| {
            // Copy some identifiers over others to create duplicates.
            for (from, to) in copies {
                if from < batch.len() && to < batch.len() {
                    let identifier = batch[from].identifier.clone();
                    batch[to].identifier = identifier;
                }
            }
            batch
        })
}
