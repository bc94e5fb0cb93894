//! File-based configuration loading

use crate::config::client_config::ClientConfig;
use crate::error::{TraceError, TraceResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file location: `~/.tracery/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tracery").join("config.toml"))
}

/// Load configuration from a file
///
/// Supports JSON and TOML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> TraceResult<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        TraceError::io_with_path(
            format!("Failed to read config file: {}", e),
            path.display().to_string(),
        )
    })?;

    let config: ClientConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            TraceError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            TraceError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}
