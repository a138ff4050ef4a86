//! Request and response types for the field encryption HTTP API.
//!
//! All bodies are JSON. Records are arbitrary JSON objects; the `fields` list
//! names the protected leaves in dot notation, with `[]` expanding arrays
//! (e.g. `"notes"`, `"entries[].text"`).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Record whose protected fields will be replaced by storage triples.
    pub record: serde_json::Value,
    /// Paths of the protected fields.
    pub fields: Vec<String>,
}

/// Successful response body for `POST /encrypt`.
///
/// String leaves at the requested paths are replaced by
/// `{ciphertext, nonce, authTag, version}` objects; `null` leaves stay `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    pub record: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Record whose protected fields hold storage triples.
    pub record: serde_json::Value,
    /// Paths of the protected fields.
    pub fields: Vec<String>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Record with triples replaced by plaintext. Unreadable fields are `null`.
    pub record: serde_json::Value,
    /// Fields that held a value but could not be decrypted.
    #[serde(default)]
    pub unreadable: Vec<UnreadableField>,
}

/// A protected field that could not be decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableField {
    /// Concrete location of the field, with array indices (e.g. `entries.2.text`).
    pub path: String,
    /// Identifier of the audit event recorded for this failure.
    pub audit_id: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Where the key came from: `"configured"` or `"insecure_default"`.
    pub key_source: String,
    /// Identifier of the algorithm used for new envelopes.
    pub algorithm: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encrypt_request_parses() {
        let req: EncryptRequest = serde_json::from_value(json!({
            "record": {"notes": "slept well", "mood": 7},
            "fields": ["notes"]
        }))
        .unwrap();
        assert_eq!(req.record["notes"], "slept well");
        assert_eq!(req.fields, vec!["notes".to_owned()]);
    }

    #[test]
    fn decrypt_response_defaults_unreadable() {
        let resp: DecryptResponse =
            serde_json::from_value(json!({"record": {"notes": null}})).unwrap();
        assert!(resp.unreadable.is_empty());
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "field is not a string");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("not a string"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            key_source: "configured".into(),
            algorithm: "aes-256-gcm".into(),
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.key_source, "configured");
    }
}
