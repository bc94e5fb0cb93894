//! Logging configuration

use serde::{Deserialize, Serialize};

/// Crates whose log output the `level` setting controls
const TRACERY_TARGETS: [&str; 3] = ["tracery", "tracery_core", "tracery_eval"];

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for the tracery crates (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Merge with another logging config; empty strings do not override
    pub fn merge(&mut self, other: LoggingConfig) {
        if !other.level.is_empty() {
            self.level = other.level;
        }
        if !other.format.is_empty() {
            self.format = other.format;
        }
    }

    /// Parsed output format. Unknown names fall back to pretty.
    pub fn log_format(&self) -> LogFormat {
        match self.format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }

    /// Env-filter directive scoping `level` to the tracery crates,
    /// e.g. `tracery=debug,tracery_core=debug,tracery_eval=debug`.
    pub fn filter_directive(&self) -> String {
        let level = if self.level.trim().is_empty() {
            "info"
        } else {
            self.level.trim()
        };
        TRACERY_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_merge_ignores_empty_strings() {
        let mut config = LoggingConfig::default();
        config.merge(LoggingConfig {
            level: "debug".to_string(),
            format: String::new(),
        });
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "pretty");
    }

    #[test]
    fn test_log_format_parsing() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "JSON".to_string(),
        };
        assert_eq!(config.log_format(), LogFormat::Json);

        let config = LoggingConfig {
            level: "info".to_string(),
            format: "fancy".to_string(),
        };
        assert_eq!(config.log_format(), LogFormat::Pretty);
    }

    #[test]
    fn test_filter_directive() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: "compact".to_string(),
        };
        assert_eq!(
            config.filter_directive(),
            "tracery=debug,tracery_core=debug,tracery_eval=debug"
        );
    }
}
