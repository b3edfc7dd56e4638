//! Wire envelope for API v2 responses.
//!
//! Every endpoint replies with the same outer shape: a `data` member on
//! success (object or array depending on the endpoint), or a `code` plus
//! optional `message`/`errors` on failure. Delete endpoints may reply with
//! an empty body, which parses as the default (empty) envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known error codes returned in [`ApiEnvelope::code`].
pub mod codes {
    /// A request argument failed server-side parsing.
    pub const INVALID_ARGUMENT: &str = "invalid_argument";
    /// The API key was rejected.
    pub const INVALID_KEY: &str = "invalid_key";
    /// The requested resource does not exist.
    pub const NOT_FOUND: &str = "not_found";
    /// One or more fields failed server-side validation.
    pub const VALIDATION_FAILED: &str = "validation_failed";
    /// The resource exists but can no longer be edited.
    pub const NOT_EDITABLE: &str = "not_editable";
    /// The resource exists but can no longer be deleted.
    pub const NOT_DELETABLE: &str = "not_deletable";
}

/// The outer shape of every API v2 response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Response payload: a resource object, or an array of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error code on failure (see [`codes`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error message, when the server provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field validation errors (populated for `validation_failed`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiFieldError>,
}

impl ApiEnvelope {
    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(codes::NOT_FOUND)
    }

    /// The `data` member as an object, if it is one.
    pub fn data_object(&self) -> Option<&serde_json::Map<String, Value>> {
        self.data.as_ref().and_then(Value::as_object)
    }

    /// The `data` member as an array, if it is one.
    pub fn data_array(&self) -> Option<&[Value]> {
        self.data
            .as_ref()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// One field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiFieldError {
    /// The field the error applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Machine-readable error codes for the field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_success_envelope() {
        let envelope: ApiEnvelope =
            serde_json::from_value(json!({"data": {"id": "j-1"}})).unwrap();
        assert!(envelope.code.is_none());
        assert_eq!(
            envelope.data_object().and_then(|o| o.get("id")),
            Some(&json!("j-1"))
        );
    }

    #[test]
    fn parses_not_found_envelope() {
        let envelope: ApiEnvelope =
            serde_json::from_value(json!({"code": "not_found"})).unwrap();
        assert!(envelope.is_not_found());
        assert!(envelope.data.is_none());
    }

    #[test]
    fn parses_validation_errors() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "code": "validation_failed",
            "errors": [{"field": "date", "codes": ["required"]}],
        }))
        .unwrap();
        assert_eq!(envelope.code.as_deref(), Some(codes::VALIDATION_FAILED));
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.errors[0].field.as_deref(), Some("date"));
    }

    #[test]
    fn data_array_accessor() {
        let envelope: ApiEnvelope =
            serde_json::from_value(json!({"data": [{"id": "a"}, {"id": "b"}]})).unwrap();
        assert_eq!(envelope.data_array().map(<[Value]>::len), Some(2));
        assert!(envelope.data_object().is_none());
    }
}
