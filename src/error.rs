use crate::catalog::ApiVersion;
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for configuration and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "base_url", "api_versions")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected format, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "resolver_config", "credential_source")
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

/// Unified error type for endpoint resolution, generation and extraction.
///
/// Lower-level failures are converted into one of these kinds at the boundary of
/// the component that observed them. Nothing here is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// One API version's discovery call failed. Recorded, never fatal on its own.
    #[error("Model discovery unavailable on {api_version}: HTTP {status}: {body}")]
    DiscoveryUnavailable {
        api_version: ApiVersion,
        status: u16,
        body: String,
    },

    /// No catalog entry in any queried version supports a known generation method.
    #[error("No usable generative model endpoint found. Catalog: {catalog}")]
    NoUsableEndpoint { catalog: String },

    #[error("Generation failed: {reason}")]
    GenerationFailed { reason: String, status: Option<u16> },

    #[error("Malformed model response: {reason}{}", format_field(.field))]
    MalformedResponse {
        field: Option<String>,
        reason: String,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_field(field: &Option<String>) -> String {
    match field {
        Some(f) => format!(" (field: {})", f),
        None => String::new(),
    }
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
    /// Create a configuration error with structured context.
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn generation_failed(reason: impl Into<String>) -> Self {
        Error::GenerationFailed {
            reason: reason.into(),
            status: None,
        }
    }

    /// Malformed response pointing at a specific field path.
    pub fn malformed_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            field: Some(field.into()),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedResponse {
            field: None,
            reason: reason.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Offending field path for malformed responses.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::MalformedResponse { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Short message suitable for showing to clinic staff.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::MalformedResponse { .. } => "The AI could not produce a usable answer. Please try again.",
            Error::GenerationFailed { .. } => "The AI service failed to respond. Please try again later.",
            Error::NoUsableEndpoint { .. } | Error::DiscoveryUnavailable { .. } => {
                "No AI model is currently available for this API key."
            }
            Error::Configuration { .. } => "The AI integration is not configured correctly.",
            Error::Transport(_) | Error::Io(_) | Error::Serialization(_) | Error::Yaml(_) => {
                "An unexpected error occurred while contacting the AI service."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_includes_field() {
        let err = Error::malformed_field("suggestedCodes[0].confidenceScore", "expected number");
        let text = err.to_string();
        assert!(text.contains("expected number"));
        assert!(text.contains("suggestedCodes[0].confidenceScore"));
        assert_eq!(err.field(), Some("suggestedCodes[0].confidenceScore"));
    }

    #[test]
    fn configuration_display_includes_context() {
        let err = Error::configuration_with_context(
            "invalid base url",
            ErrorContext::new()
                .with_field_path("base_url")
                .with_source("resolver_config"),
        );
        let text = err.to_string();
        assert!(text.contains("field: base_url"));
        assert!(text.contains("source: resolver_config"));
        assert!(err.context().is_some());
    }

    #[test]
    fn user_message_for_malformed() {
        assert!(Error::malformed("no json")
            .user_message()
            .contains("could not produce a usable answer"));
    }
}
