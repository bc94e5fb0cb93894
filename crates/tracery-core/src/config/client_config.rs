//! Client configuration

use crate::config::logging_config::LoggingConfig;
use crate::error::{TraceError, TraceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default API endpoint of a locally running tracing service
pub const DEFAULT_API_URL: &str = "http://localhost:1984";

/// Project runs are recorded under when none is given
pub const DEFAULT_PROJECT: &str = "default";

/// Number of items requested per page by list cursors
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default connection timeout (10 seconds)
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 10;

/// Default request timeout (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout configuration handed to the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Seconds allowed for establishing a connection
    pub connection_timeout_secs: u64,
    /// Seconds allowed for a whole request
    pub request_timeout_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: DEFAULT_CONNECTION_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl TimeoutConfig {
    /// Connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration for talking to the tracing service
///
/// # Examples
///
/// ```
/// use tracery_core::config::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:1984")
///     .with_default_project("my-project")
///     .with_page_size(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the service API
    pub api_url: String,
    /// Project used by run trees that do not name one
    pub default_project: String,
    /// Page size for list cursors
    pub page_size: usize,
    /// Transport timeouts
    pub timeouts: TimeoutConfig,
    /// Extra HTTP headers sent with every request
    pub headers: HashMap<String, String>,
    /// Logging settings used by the facade's subscriber
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            default_project: DEFAULT_PROJECT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeouts: TimeoutConfig::default(),
            headers: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at the given API URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Default::default()
        }
    }

    /// Set the default project name
    pub fn with_default_project(mut self, project: impl Into<String>) -> Self {
        self.default_project = project.into();
        self
    }

    /// Set the page size used by list cursors
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the transport timeouts
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Add an HTTP header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// API URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> TraceResult<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(TraceError::config("api_url must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TraceError::config_with_context(
                format!("api_url must use http or https: {}", url),
                "Validating client configuration",
            ));
        }
        if self.page_size == 0 {
            return Err(TraceError::config("page_size must be greater than zero"));
        }
        if self.default_project.trim().is_empty() {
            return Err(TraceError::config("default_project must not be empty"));
        }
        Ok(())
    }

    /// Merge another config on top of this one.
    ///
    /// Fields still at their default value in `other` do not override.
    pub fn merge(&mut self, other: ClientConfig) {
        let defaults = ClientConfig::default();
        if other.api_url != defaults.api_url {
            self.api_url = other.api_url;
        }
        if other.default_project != defaults.default_project {
            self.default_project = other.default_project;
        }
        if other.page_size != defaults.page_size {
            self.page_size = other.page_size;
        }
        if other.timeouts != defaults.timeouts {
            self.timeouts = other.timeouts;
        }
        self.headers.extend(other.headers);
        self.logging.merge(other.logging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.default_project, "default");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("ftp://example.com").validate().is_err());
        assert!(
            ClientConfig::default()
                .with_page_size(0)
                .validate()
                .is_err()
        );
        assert!(
            ClientConfig::default()
                .with_default_project("  ")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = ClientConfig::new("http://localhost:1984/");
        assert_eq!(config.base_url(), "http://localhost:1984");
    }

    #[test]
    fn test_merge_keeps_defaults_from_other() {
        let mut base = ClientConfig::new("https://traces.example.com").with_page_size(20);
        let other = ClientConfig::default()
            .with_default_project("evals")
            .with_header("X-Team", "ml");

        base.merge(other);
        assert_eq!(base.api_url, "https://traces.example.com");
        assert_eq!(base.page_size, 20);
        assert_eq!(base.default_project, "evals");
        assert_eq!(base.headers.get("X-Team").map(String::as_str), Some("ml"));
    }

    #[test]
    fn test_timeouts_as_duration() {
        let timeouts = TimeoutConfig {
            connection_timeout_secs: 3,
            request_timeout_secs: 7,
        };
        assert_eq!(timeouts.connection_timeout(), Duration::from_secs(3));
        assert_eq!(timeouts.request_timeout(), Duration::from_secs(7));
    }
}
