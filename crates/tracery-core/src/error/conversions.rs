//! From trait implementations for TraceError conversions

use super::types::TraceError;

impl From<anyhow::Error> for TraceError {
    fn from(error: anyhow::Error) -> Self {
        Self::other(error.to_string())
    }
}

impl From<std::io::Error> for TraceError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for TraceError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for TraceError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {}", error))
    }
}

impl From<reqwest::Error> for TraceError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
            context: None,
        }
    }
}

impl From<uuid::Error> for TraceError {
    fn from(error: uuid::Error) -> Self {
        Self::invalid_input(format!("Invalid identifier: {}", error))
    }
}
