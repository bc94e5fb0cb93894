//! Core error types and traits for Tracery

use thiserror::Error;

/// Result type alias for Tracery operations
pub type TraceResult<T> = Result<T, TraceError>;

/// Unified error trait that all Tracery errors implement.
///
/// This trait ensures consistent error handling across all crates by providing:
/// - error_code(): Unique code for programmatic error identification
/// - message(): Human-readable error message
/// - context(): Optional additional context
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is worth retrying.
    ///
    /// The core never retries by itself; this is a hint for callers.
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Main error type for Tracery
///
/// Local precondition failures (`InvalidState`) are raised before any network
/// call. Remote failures surface as `Http` or `NotFound` and are never retried
/// inside the core.
#[derive(Error, Debug, Clone)]
pub enum TraceError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Invalid caller input
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
        context: Option<String>,
    },

    /// Operation called in a state that does not allow it
    #[error("Invalid state: {message}")]
    InvalidState {
        message: String,
        context: Option<String>,
    },

    /// HTTP request errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        context: Option<String>,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
        context: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
        context: Option<String>,
    },

    /// Grading failures raised by an evaluator
    #[error("Evaluator error: {evaluator}: {message}")]
    Evaluator {
        evaluator: String,
        message: String,
        context: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
