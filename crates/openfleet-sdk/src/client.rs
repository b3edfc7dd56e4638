//! HTTP client for the OpenFleet API.
//!
//! [`OpenFleetClient`] holds the base URL, the API key, and a reqwest
//! client, and exposes one low-level operation per transport shape: JSON
//! request/response ([`send`](OpenFleetClient::send)), query-string reads
//! ([`get_with_query`](OpenFleetClient::get_with_query)), and raw byte
//! downloads ([`download`](OpenFleetClient::download)). The per-resource
//! operations in [`crate::jobs`] and [`crate::vehicles`] are built on top.
//!
//! # Typical usage
//!
//! ```rust,no_run
//! use openfleet_sdk::OpenFleetClient;
//! use openfleet_models::Job;
//!
//! # async fn run() -> Result<(), openfleet_sdk::SdkError> {
//! let client = OpenFleetClient::new("myapikey123")?;
//!
//! let mut job = Job::delivery();
//! job.set_do_number("DO-1001");
//! job.set_date("2024-06-01");
//! job.set_address("1 Fleet Street, Singapore");
//! client.create_job(&mut job).await?;
//!
//! println!("created job {}", job.id().unwrap_or("?"));
//! # Ok(())
//! # }
//! ```

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

use openfleet_models::response::codes;
use openfleet_models::ApiEnvelope;

use crate::error::SdkError;

/// Production base URL, including the API version segment.
pub const DEFAULT_BASE_URL: &str = "https://app.openfleet.io/api/v2";

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// A configured connection to one OpenFleet account.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct OpenFleetClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenFleetClient {
    /// Create a client for the production API.
    ///
    /// # Errors
    ///
    /// [`SdkError::InvalidApiKey`] when the key is empty or contains
    /// characters outside `[A-Za-z0-9]`.
    pub fn new(api_key: &str) -> Result<Self, SdkError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a non-default base URL (staging, local
    /// mock).
    ///
    /// # Errors
    ///
    /// [`SdkError::InvalidApiKey`] for a malformed key, or
    /// [`SdkError::Config`] for an empty base URL.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, SdkError> {
        if base_url.is_empty() {
            return Err(SdkError::Config("base URL must not be empty".into()));
        }
        if api_key.is_empty() {
            return Err(SdkError::InvalidApiKey("API key must not be empty".into()));
        }
        if !api_key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SdkError::InvalidApiKey(
                "API key contains illegal characters".into(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Issue one JSON request and parse the response envelope.
    ///
    /// Outbound payloads are wrapped in `{"data": ...}` as the API expects.
    /// An empty response body (delete endpoints) parses as the default
    /// envelope. Server-side error codes are **not** turned into `Err`
    /// here; resource operations decide how to treat them (e.g.
    /// `not_found` becomes `Ok(None)` on reads).
    ///
    /// # Errors
    ///
    /// [`SdkError::Http`] on transport failure, [`SdkError::Serialization`]
    /// when the body is not a valid envelope.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ApiEnvelope, SdkError> {
        let url = self.url(path);
        tracing::debug!(%method, path, "openfleet api request");
        let mut request = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(payload) = payload {
            request = request.json(&serde_json::json!({ "data": payload }));
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if body.is_empty() {
            tracing::debug!(%status, path, "empty response body");
            return Ok(ApiEnvelope::default());
        }
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;
        if let Some(code) = envelope.code.as_deref() {
            tracing::debug!(%status, path, code, "api reported an error code");
        }
        Ok(envelope)
    }

    /// Issue a GET with query-string parameters and parse the envelope.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`send`](Self::send).
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<ApiEnvelope, SdkError> {
        let url = self.url(path);
        tracing::debug!(path, "openfleet api list request");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await?;
        let body = response.text().await?;
        if body.is_empty() {
            return Ok(ApiEnvelope::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Download a document as raw bytes.
    ///
    /// Returns `None` when the server replies 404 (no such document or no
    /// such resource).
    ///
    /// # Errors
    ///
    /// [`SdkError::Http`] on transport failure.
    pub async fn download(&self, path: &str) -> Result<Option<Vec<u8>>, SdkError> {
        let url = self.url(path);
        tracing::debug!(path, "openfleet document download");
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let bytes = response.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }
}

/// Turn a server-reported error code into an [`SdkError`].
///
/// `validation_failed` surfaces its field errors; every other code becomes
/// [`SdkError::Api`]. Envelopes without a code pass through unchanged.
pub(crate) fn check(envelope: ApiEnvelope) -> Result<ApiEnvelope, SdkError> {
    match envelope.code.as_deref() {
        None => Ok(envelope),
        Some(codes::VALIDATION_FAILED) => Err(SdkError::Validation {
            errors: envelope.errors,
        }),
        Some(code) => Err(SdkError::Api {
            code: code.to_string(),
            message: envelope.message.unwrap_or_default(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(
            OpenFleetClient::new(""),
            Err(SdkError::InvalidApiKey(_))
        ));
    }

    #[test]
    fn rejects_illegal_api_key_characters() {
        assert!(matches!(
            OpenFleetClient::new("key with spaces!"),
            Err(SdkError::InvalidApiKey(_))
        ));
    }

    #[test]
    fn accepts_alphanumeric_api_key() {
        let client = OpenFleetClient::new("abcDEF123").unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            OpenFleetClient::with_base_url("http://localhost:8080/api/v2/", "k1").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v2");
        assert_eq!(client.url("jobs"), "http://localhost:8080/api/v2/jobs");
    }

    #[test]
    fn rejects_empty_base_url() {
        assert!(matches!(
            OpenFleetClient::with_base_url("", "k1"),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn check_passes_clean_envelopes() {
        let envelope: ApiEnvelope =
            serde_json::from_value(json!({"data": {"id": "j-1"}})).unwrap();
        assert!(check(envelope).is_ok());
    }

    #[test]
    fn check_maps_validation_failures() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "code": "validation_failed",
            "errors": [{"field": "date", "codes": ["required"]}],
        }))
        .unwrap();
        assert!(matches!(check(envelope), Err(SdkError::Validation { .. })));
    }

    #[test]
    fn check_maps_other_codes_to_api_errors() {
        let envelope: ApiEnvelope = serde_json::from_value(json!({
            "code": "not_editable",
            "message": "job already completed",
        }))
        .unwrap();
        match check(envelope) {
            Err(SdkError::Api { code, message }) => {
                assert_eq!(code, "not_editable");
                assert_eq!(message, "job already completed");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
