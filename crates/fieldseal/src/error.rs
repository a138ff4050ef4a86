//! Error taxonomy for the field encryption core.
//!
//! None of these types ever carry key bytes, plaintext, or ciphertext. The
//! `Display` output is safe to log.

use thiserror::Error;

use crate::crypto::TAG_LEN;
use crate::key::KEY_LEN;

/// Malformed or missing key/algorithm configuration.
///
/// Fatal at startup: the host must refuse to become ready.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No secret was configured and the required-key policy is enabled.
    #[error("encryption key is required but not configured")]
    MissingKey,

    /// The configured secret is a well-known placeholder value.
    #[error("encryption key is a placeholder value and cannot be used with a required key")]
    PlaceholderKey,

    /// The configured secret is shorter than the key length.
    #[error("encryption key too short: expected at least {KEY_LEN} bytes, got {actual}")]
    KeyTooShort { actual: usize },

    /// Raw key material of the wrong length was supplied.
    #[error("invalid key length: expected {KEY_LEN} bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    /// The algorithm identifier is unknown or cannot be used for sealing.
    #[error("unsupported encryption algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Authentication tag verification failed.
///
/// Deliberately carries no detail: a wrong key and corrupted data are
/// indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("envelope authentication failed")]
pub struct TamperError;

/// Which component of a stored envelope a [`FormatError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePart {
    Ciphertext,
    Nonce,
    AuthTag,
}

impl std::fmt::Display for EnvelopePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EnvelopePart::Ciphertext => "ciphertext",
            EnvelopePart::Nonce => "nonce",
            EnvelopePart::AuthTag => "authTag",
        })
    }
}

/// A stored envelope is not validly encoded.
///
/// Raised before any cipher call, so storage corruption is reported as such
/// instead of as an authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A field is not valid hexadecimal (or base64url in the compact form).
    #[error("{0} is not validly encoded")]
    InvalidEncoding(EnvelopePart),

    /// A fixed-length field has the wrong number of bytes.
    #[error("{part} has invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        part: EnvelopePart,
        expected: usize,
        actual: usize,
    },

    /// The version tag does not name a known algorithm.
    #[error("unknown envelope version: {0}")]
    UnknownVersion(u8),

    /// A compact token does not match `v<version>.<nonce>.<ciphertext>.<tag>`.
    #[error("malformed compact envelope token")]
    MalformedToken,

    /// A stored value is neither `null` nor a `{ciphertext, nonce, authTag}` object.
    #[error("stored value is not an encrypted field object")]
    MalformedTriple,

    /// The envelope authenticated but its content is not UTF-8 text.
    #[error("decrypted field is not valid UTF-8")]
    NotUtf8,
}

impl FormatError {
    pub(crate) fn tag_length(actual: usize) -> Self {
        FormatError::InvalidLength {
            part: EnvelopePart::AuthTag,
            expected: TAG_LEN,
            actual,
        }
    }
}

/// Errors produced by sealing a plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SealError {
    /// The key could not be used by the cipher.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The AEAD refused the input (plaintext beyond the algorithm's limit).
    #[error("aead encryption failed")]
    Aead,
}
