//! Remote addresses.
//!
//! The document store addresses a collection as `{base}.json` and a record
//! in it as `{base}/{identifier}.json`.

use tasks_core::representation::format_identifier;
use url::Url;
use uuid::Uuid;

use crate::error::ConfigError;

/// Builds request URLs from a base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse and validate a base URL.
    ///
    /// Only `http` and `https` bases are accepted. Query and fragment are
    /// dropped; a trailing slash is ignored.
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base.to_string(),
            reason,
        };

        let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("not a base URL".into()));
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self { base: url })
    }

    /// The base URL as configured.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Address of the whole collection: `{base}.json`.
    pub fn collection(&self) -> Url {
        let trimmed = self.trimmed_path();
        let path = if trimmed.is_empty() {
            "/.json".to_string()
        } else {
            format!("{}.json", trimmed)
        };
        self.with_path(&path)
    }

    /// Address of one record: `{base}/{identifier}.json`.
    pub fn record(&self, identifier: &Uuid) -> Url {
        let path = format!("{}/{}.json", self.trimmed_path(), format_identifier(identifier));
        self.with_path(&path)
    }

    fn trimmed_path(&self) -> &str {
        self.base.path().trim_end_matches('/')
    }

    fn with_path(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> Uuid {
        Uuid::parse_str("0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0").unwrap()
    }

    #[test]
    fn test_bare_host() {
        let endpoints = Endpoints::new("https://tasks-3f211.firebaseio.com/").unwrap();
        assert_eq!(
            endpoints.collection().as_str(),
            "https://tasks-3f211.firebaseio.com/.json"
        );
        assert_eq!(
            endpoints.record(&id()).as_str(),
            "https://tasks-3f211.firebaseio.com/0F1E2D3C-4B5A-6978-8796-A5B4C3D2E1F0.json"
        );
    }

    #[test]
    fn test_nested_path() {
        for base in ["https://example.com/users/7/tasks", "https://example.com/users/7/tasks/"] {
            let endpoints = Endpoints::new(base).unwrap();
            assert_eq!(
                endpoints.collection().as_str(),
                "https://example.com/users/7/tasks.json"
            );
            assert_eq!(
                endpoints.record(&id()).as_str(),
                "https://example.com/users/7/tasks/0F1E2D3C-4B5A-6978-8796-A5B4C3D2E1F0.json"
            );
        }
    }

    #[test]
    fn test_query_is_dropped() {
        let endpoints = Endpoints::new("http://localhost:9000/?ns=tasks#top").unwrap();
        assert_eq!(endpoints.collection().as_str(), "http://localhost:9000/.json");
    }

    #[test]
    fn test_rejects_invalid_bases() {
        assert!(Endpoints::new("not a url").is_err());
        assert!(Endpoints::new("ftp://example.com/").is_err());
        assert!(Endpoints::new("mailto:someone@example.com").is_err());
    }
}
