//! The wire form of a task.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// A task as it is stored in the remote document store.
///
/// The identifier is kept as a string because the remote side is not
/// trusted to hold a well-formed UUID. Use [`TaskRepresentation::uuid`] to
/// get the parsed identifier; representations where it returns `None` are
/// never merged into the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRepresentation {
    pub complete: bool,
    pub identifier: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub priority: String,
}

impl TaskRepresentation {
    /// Parse the identifier.
    ///
    /// Only the 36-character hyphenated form is accepted, in either case.
    pub fn uuid(&self) -> Option<Uuid> {
        parse_identifier(&self.identifier).ok()
    }
}

/// Parse a hyphenated UUID string.
pub fn parse_identifier(s: &str) -> Result<Uuid, CoreError> {
    if s.len() != uuid::fmt::Hyphenated::LENGTH {
        return Err(CoreError::InvalidIdentifier(s.to_string()));
    }
    Uuid::parse_str(s).map_err(|_| CoreError::InvalidIdentifier(s.to_string()))
}

/// Format an identifier the way the remote store keys records:
/// uppercase, hyphenated.
pub fn format_identifier(id: &Uuid) -> String {
    id.hyphenated()
        .encode_upper(&mut Uuid::encode_buffer())
        .to_string()
}
