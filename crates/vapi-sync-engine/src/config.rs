//! Migration configuration

use crate::error::SyncError;
use std::fmt;
use std::path::PathBuf;
use vapi_sync_client::DEFAULT_BASE_URL;

/// Default mapping file, relative to the working directory
pub const DEFAULT_MAPPING_FILE: &str = ".vapi-sync.json";

/// Bearer credentials for both accounts
///
/// Reads always use `source`; creates and updates always use `destination`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub source: String,
    pub destination: String,
}

impl Credentials {
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("source", &"<redacted>")
            .field("destination", &"<redacted>")
            .finish()
    }
}

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Account credentials
    pub credentials: Credentials,
    /// API base URL shared by both accounts
    pub base_url: String,
    /// Persisted mapping table
    pub mapping_path: PathBuf,
}

impl MigrationConfig {
    /// Configuration with default base URL and mapping file
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            mapping_path: PathBuf::from(DEFAULT_MAPPING_FILE),
        }
    }

    /// With base URL override
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With mapping file path
    #[inline]
    #[must_use]
    pub fn with_mapping_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_path = path.into();
        self
    }

    /// Check required inputs before any I/O
    ///
    /// # Errors
    /// [`SyncError::Configuration`] naming the first missing input
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.credentials.source.trim().is_empty() {
            return Err(SyncError::configuration("source API key is required"));
        }
        if self.credentials.destination.trim().is_empty() {
            return Err(SyncError::configuration("destination API key is required"));
        }
        if self.base_url.trim().is_empty() {
            return Err(SyncError::configuration("base URL must not be empty"));
        }
        if self.mapping_path.as_os_str().is_empty() {
            return Err(SyncError::configuration("mapping file path must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MigrationConfig::new(Credentials::new("src", "dst"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.mapping_path, PathBuf::from(DEFAULT_MAPPING_FILE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_credentials_are_configuration_errors() {
        let err = MigrationConfig::new(Credentials::new("", "dst"))
            .validate()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("source"));

        let err = MigrationConfig::new(Credentials::new("src", "  "))
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn builder_overrides() {
        let config = MigrationConfig::new(Credentials::new("src", "dst"))
            .with_base_url("http://localhost:9000")
            .with_mapping_path("state/map.json");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.mapping_path, PathBuf::from("state/map.json"));

        let empty = config.with_mapping_path("");
        assert!(empty.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn debug_redacts_credentials() {
        let rendered = format!("{:?}", Credentials::new("secret-a", "secret-b"));
        assert!(!rendered.contains("secret-a"));
        assert!(!rendered.contains("secret-b"));
    }
}
