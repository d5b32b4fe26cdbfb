//! Configuration for the task controller.

use std::path::PathBuf;
use std::time::Duration;

use tasks_sync::{HttpConfig, QueryFailurePolicy, SyncConfig};

/// Where local tasks are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreLocation {
    /// An in-memory SQLite database, lost on exit.
    #[default]
    Memory,
    /// A SQLite database file.
    File(PathBuf),
}

/// Configuration for [`TaskController::open`](crate::TaskController::open).
#[derive(Debug, Clone, Default)]
pub struct TasksConfig {
    pub store: StoreLocation,
    pub sync: SyncConfig,
    pub http: HttpConfig,
}

impl TasksConfig {
    /// Keep tasks in a database file.
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = StoreLocation::File(path.into());
        self
    }

    /// Sync against a different remote.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.sync = self.sync.with_base_url(base_url);
        self
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = Some(timeout);
        self
    }

    /// Choose what reconciliation does when the local lookup fails.
    pub fn with_query_failure_policy(mut self, policy: QueryFailurePolicy) -> Self {
        self.sync.reconcile.on_query_failure = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasks_sync::DEFAULT_BASE_URL;

    #[test]
    fn test_defaults() {
        let config = TasksConfig::default();
        assert_eq!(config.store, StoreLocation::Memory);
        assert_eq!(config.sync.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.http.timeout, None);
        assert_eq!(config.sync.reconcile.on_query_failure, QueryFailurePolicy::Abort);
    }

    #[test]
    fn test_builders() {
        let config = TasksConfig::default()
            .with_database("/tmp/tasks.db")
            .with_base_url("http://localhost:9000/")
            .with_timeout(Duration::from_secs(5))
            .with_query_failure_policy(QueryFailurePolicy::Proceed);

        assert_eq!(config.store, StoreLocation::File("/tmp/tasks.db".into()));
        assert_eq!(config.sync.base_url, "http://localhost:9000/");
        assert_eq!(config.http.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.sync.reconcile.on_query_failure, QueryFailurePolicy::Proceed);
    }
}
