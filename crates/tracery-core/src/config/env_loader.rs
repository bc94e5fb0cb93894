//! Environment variable-based configuration loading

use crate::config::client_config::ClientConfig;
use crate::error::{TraceError, TraceResult};
use std::env;

pub const ENV_API_URL: &str = "TRACERY_API_URL";
pub const ENV_PROJECT: &str = "TRACERY_PROJECT";
pub const ENV_PAGE_SIZE: &str = "TRACERY_PAGE_SIZE";
pub const ENV_CONNECT_TIMEOUT: &str = "TRACERY_CONNECT_TIMEOUT";
pub const ENV_REQUEST_TIMEOUT: &str = "TRACERY_REQUEST_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "TRACERY_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "TRACERY_LOG_FORMAT";

/// Apply `TRACERY_*` environment overrides to `config`
pub fn apply_env_overrides(config: &mut ClientConfig) -> TraceResult<()> {
    apply_overrides_from(config, |key| env::var(key).ok())
}

/// Apply overrides read through `lookup`.
///
/// Separated from the process environment so callers and tests can supply
/// their own variable source.
pub fn apply_overrides_from<F>(config: &mut ClientConfig, lookup: F) -> TraceResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL) {
        config.api_url = url;
    }

    if let Some(project) = lookup(ENV_PROJECT) {
        config.default_project = project;
    }

    if let Some(page_size) = lookup(ENV_PAGE_SIZE) {
        config.page_size = parse_number(ENV_PAGE_SIZE, &page_size)?;
    }

    if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT) {
        config.timeouts.connection_timeout_secs = parse_number(ENV_CONNECT_TIMEOUT, &secs)?;
    }

    if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
        config.timeouts.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT, &secs)?;
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    if let Some(format) = lookup(ENV_LOG_FORMAT) {
        config.logging.format = format;
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str) -> TraceResult<T> {
    raw.trim().parse().map_err(|_| {
        TraceError::config_with_context(
            format!("Invalid {} value", var),
            format!("Parsing '{}' as a number", raw),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = ClientConfig::default();
        apply_overrides_from(
            &mut config,
            lookup_from(&[
                (ENV_API_URL, "https://api.example.com"),
                (ENV_PROJECT, "ci"),
                (ENV_PAGE_SIZE, "7"),
                (ENV_REQUEST_TIMEOUT, "120"),
                (ENV_LOG_FORMAT, "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.default_project, "ci");
        assert_eq!(config.page_size, 7);
        assert_eq!(config.timeouts.request_timeout_secs, 120);
        assert_eq!(config.timeouts.connection_timeout_secs, 10);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_number_rejected() {
        let mut config = ClientConfig::default();
        let err =
            apply_overrides_from(&mut config, lookup_from(&[(ENV_PAGE_SIZE, "lots")])).unwrap_err();
        assert!(err.to_string().contains(ENV_PAGE_SIZE));
    }

    #[test]
    fn test_no_variables_leaves_config_untouched() {
        let mut config = ClientConfig::default();
        apply_overrides_from(&mut config, |_| None).unwrap();
        assert_eq!(config.api_url, ClientConfig::default().api_url);
    }
}
