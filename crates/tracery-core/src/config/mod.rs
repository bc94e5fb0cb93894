//! Configuration management for Tracery

mod client_config;
mod file_loader;
mod logging_config;

pub mod env_loader;
pub mod loader;

pub use client_config::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_PAGE_SIZE, DEFAULT_PROJECT, TimeoutConfig,
};
pub use file_loader::{default_config_path, load_from_file};
pub use loader::{ConfigLoader, ConfigSource, load_config};
pub use logging_config::{LogFormat, LoggingConfig};
