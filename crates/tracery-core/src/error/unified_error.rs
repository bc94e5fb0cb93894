//! UnifiedError trait implementation for TraceError

use super::types::{TraceError, UnifiedError};

impl UnifiedError for TraceError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "TRACE_CONFIG",
            Self::InvalidInput { .. } => "TRACE_INVALID_INPUT",
            Self::InvalidState { .. } => "TRACE_INVALID_STATE",
            Self::Http { .. } => "TRACE_HTTP",
            Self::NotFound { .. } => "TRACE_NOT_FOUND",
            Self::Json { .. } => "TRACE_JSON",
            Self::Io { .. } => "TRACE_IO",
            Self::Evaluator { .. } => "TRACE_EVALUATOR",
            Self::Other { .. } => "TRACE_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::InvalidState { message, .. }
            | Self::Http { message, .. }
            | Self::NotFound { message, .. }
            | Self::Json { message, .. }
            | Self::Io { message, .. }
            | Self::Evaluator { message, .. }
            | Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::InvalidState { context, .. }
            | Self::Http { context, .. }
            | Self::NotFound { context, .. }
            | Self::Json { context, .. }
            | Self::Io { context, .. }
            | Self::Evaluator { context, .. }
            | Self::Other { context, .. } => context.as_deref(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            // No status means the request never got a response
            Self::Http {
                status_code: None, ..
            } => true,
            Self::Http {
                status_code: Some(code),
                ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}
