//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: unparseable JSON body, bad path, or a
    /// non-string field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Sealing a field failed; the write must be aborted.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::EncryptionFailure(_) | ServiceError::Internal(_) => "internal_error",
        }
    }

    /// Message safe to return to callers.
    ///
    /// Server-side failures are reported generically; details stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::BadRequest(msg) => msg.clone(),
            ServiceError::EncryptionFailure(_) => "encryption failed".into(),
            ServiceError::Internal(_) => "internal error".into(),
        }
    }
}
