//! Task priority values.
//!
//! Records and the wire both carry priority as a free string so that values
//! written by newer clients survive a round trip. This enum names the values
//! the app itself offers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The priorities a user can pick for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

impl TaskPriority {
    /// All priorities, lowest first.
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Normal,
        TaskPriority::High,
        TaskPriority::Critical,
    ];

    /// The string stored on records and sent over the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Normal => "normal",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPriority(s.to_string()))
    }
}

impl From<TaskPriority> for String {
    fn from(priority: TaskPriority) -> Self {
        priority.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse() {
        for p in TaskPriority::ALL {
            assert_eq!(p.as_str().parse::<TaskPriority>().unwrap(), p);
        }
        assert_eq!(
            "urgent".parse::<TaskPriority>(),
            Err(CoreError::UnknownPriority("urgent".into()))
        );
    }

    #[test]
    fn test_priority_default_is_normal() {
        assert_eq!(TaskPriority::default(), TaskPriority::Normal);
        assert_eq!(TaskPriority::default().to_string(), "normal");
    }
}
