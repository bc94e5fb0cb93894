//! Constructor methods for TraceError

use super::types::TraceError;

impl TraceError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
            context: None,
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
            context: None,
        }
    }

    /// Create a new invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            context: None,
        }
    }

    /// Create an invalid state error with context
    pub fn invalid_state_with_context(
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            status_code: None,
            context: None,
        }
    }

    /// Create an HTTP error carrying the response status and URL
    pub fn http_status(message: impl Into<String>, url: impl Into<String>, status: u16) -> Self {
        Self::Http {
            message: message.into(),
            url: Some(url.into()),
            status_code: Some(status),
            context: None,
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: None,
            context: None,
        }
    }

    /// Create a not found error with resource type
    pub fn not_found_resource(
        message: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            message: message.into(),
            resource_type: Some(resource_type.into()),
            context: None,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            context: None,
        }
    }

    /// Create an IO error with path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
            context: None,
        }
    }

    /// Create a new evaluator error
    pub fn evaluator(evaluator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Evaluator {
            evaluator: evaluator.into(),
            message: message.into(),
            context: None,
        }
    }

    /// Create a new generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to an existing error, replacing any previous context
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        let ctx = Some(ctx.into());
        match &mut self {
            Self::Config { context, .. }
            | Self::InvalidInput { context, .. }
            | Self::InvalidState { context, .. }
            | Self::Http { context, .. }
            | Self::NotFound { context, .. }
            | Self::Json { context, .. }
            | Self::Io { context, .. }
            | Self::Evaluator { context, .. }
            | Self::Other { context, .. } => *context = ctx,
        }
        self
    }
}
