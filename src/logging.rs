//! Subscriber setup for applications using Tracery

use tracery_core::config::{LogFormat, LoggingConfig};
use tracery_core::error::{TraceError, TraceResult};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set. Fails if a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> TraceResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.log_format() {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| TraceError::config(format!("Failed to initialize logging: {}", e)))
}
