//! Configuration loading from layered sources

use crate::config::client_config::ClientConfig;
use crate::config::{env_loader, file_loader};
use crate::error::TraceResult;
use std::path::{Path, PathBuf};

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file
    File(PathBuf),
    /// Configuration from `TRACERY_*` environment variables
    Environment,
    /// Default configuration
    Default,
}

/// Configuration loader. Later sources win over earlier ones.
///
/// # Examples
///
/// ```no_run
/// use tracery_core::config::ConfigLoader;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("tracery.toml")
///     .with_env()
///     .load()?;
/// println!("Sending traces to {}", config.api_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add the default file location (`~/.tracery/config.toml`) if a home
    /// directory is known
    pub fn with_default_file(self) -> Self {
        match file_loader::default_config_path() {
            Some(path) => self.with_file(path),
            None => self,
        }
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load configuration from all sources and validate the result
    pub fn load(self) -> TraceResult<ClientConfig> {
        let mut config = ClientConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading client config from {}", path.display());
                    config.merge(file_loader::load_from_file(path)?);
                }
                ConfigSource::Environment => env_loader::apply_env_overrides(&mut config)?,
                ConfigSource::Default => config.merge(ClientConfig::default()),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load configuration from defaults, the default file and the environment
pub fn load_config() -> TraceResult<ClientConfig> {
    ConfigLoader::new()
        .with_defaults()
        .with_default_file()
        .with_env()
        .load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_layer_over_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracery.toml");
        fs::write(&path, "default_project = \"from-file\"\npage_size = 5\n").unwrap();

        let config = ConfigLoader::new()
            .with_defaults()
            .with_file(&path)
            .load()
            .unwrap();
        assert_eq!(config.default_project, "from-file");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.api_url, "http://localhost:1984");
    }

    #[test]
    fn test_invalid_result_fails_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tracery.json");
        fs::write(&path, r#"{ "api_url": "localhost" }"#).unwrap();

        assert!(ConfigLoader::new().with_file(&path).load().is_err());
    }
}
