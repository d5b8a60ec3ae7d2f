use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field or configuration key that caused the error (e.g., "base_url", "media_type")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected values, actual value)
    pub details: Option<String>,
    /// Component that produced the error ("builder", "transport", "parse", "cli")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the GPT-SoVITS client.
///
/// Every failure is returned to the caller; none of these are fatal to the process.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with a status the operation does not accept.
    #[error("Remote error: HTTP {status} from {endpoint}: {message}")]
    Remote {
        status: u16,
        endpoint: String,
        message: String,
    },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Build a server-reported failure from a status code and raw response body.
    pub fn remote(status: u16, endpoint: impl Into<String>, body: &[u8]) -> Self {
        Error::Remote {
            status,
            endpoint: endpoint.into(),
            message: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// HTTP status reported by the server, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            Error::Transport(TransportError::Http(e)) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the request never produced a server response (connect failure, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_carries_status_and_body() {
        let err = Error::remote(400, "/set_gpt_weights", br#"{"error":"file not found"}"#);
        assert_eq!(err.status(), Some(400));
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("file not found"));
        assert!(!err.is_transport());
    }

    #[test]
    fn context_is_rendered_in_display() {
        let err = Error::validation_with_context(
            "unknown control command",
            ErrorContext::new()
                .with_field_path("command")
                .with_details("expected restart or exit")
                .with_source("parse"),
        );
        assert_eq!(
            err.to_string(),
            "Validation error: unknown control command (field: command, details: expected restart or exit, source: parse)"
        );
        assert_eq!(err.context().and_then(|c| c.field_path.as_deref()), Some("command"));
    }

    #[test]
    fn empty_context_adds_nothing() {
        let err = Error::configuration("bad base url");
        assert_eq!(err.to_string(), "Configuration error: bad base url");
        assert_eq!(err.status(), None);
    }
}
