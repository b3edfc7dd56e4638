//! SDK error types.
//!
//! [`SdkError`] is the single error type returned by every fallible
//! operation in the SDK. It wraps transport, serialization and API-side
//! failures into a unified enum.

use openfleet_models::{ApiFieldError, ModelError};

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Invalid or missing configuration (e.g. bad base URL).
    #[error("configuration error: {0}")]
    Config(String),

    /// The API key failed local validation.
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    /// A required field was unset before a create/update request.
    #[error("missing required field \"{field}\" on resource \"{resource}\"")]
    MissingField {
        /// The resource being sent.
        resource: &'static str,
        /// The unset required field.
        field: &'static str,
    },

    /// HTTP request failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server replied with an error code.
    #[error("API error {code}: {message}")]
    Api {
        /// Machine-readable error code (see `openfleet_models::codes`).
        code: String,
        /// Human-readable message, when the server provided one.
        message: String,
    },

    /// The server rejected one or more fields.
    #[error("validation failed: {}", format_field_errors(errors))]
    Validation {
        /// Per-field errors as reported by the server.
        errors: Vec<ApiFieldError>,
    },

    /// A local model error (unknown or missing field).
    #[error(transparent)]
    Model(#[from] ModelError),
}

fn format_field_errors(errors: &[ApiFieldError]) -> String {
    errors
        .iter()
        .map(|e| {
            format!(
                "{} [{}]",
                e.field.as_deref().unwrap_or("?"),
                e.codes.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_field() {
        let err = SdkError::MissingField {
            resource: "job",
            field: "date",
        };
        assert_eq!(
            err.to_string(),
            "missing required field \"date\" on resource \"job\""
        );
    }

    #[test]
    fn error_display_api() {
        let err = SdkError::Api {
            code: "not_editable".into(),
            message: "job already completed".into(),
        };
        assert_eq!(err.to_string(), "API error not_editable: job already completed");
    }

    #[test]
    fn error_display_validation() {
        let err = SdkError::Validation {
            errors: vec![ApiFieldError {
                field: Some("date".into()),
                codes: vec!["required".into()],
            }],
        };
        assert_eq!(err.to_string(), "validation failed: date [required]");
    }

    #[test]
    fn model_errors_convert() {
        let err: SdkError = ModelError::UnknownField {
            resource: "job",
            field: "colour".into(),
        }
        .into();
        assert!(matches!(err, SdkError::Model(_)));
    }
}
