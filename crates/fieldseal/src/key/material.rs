//! [`KeyMaterial`]: the resolved 256-bit key and its provenance.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sha2::Sha256;
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ConfigError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Secret substituted when no key is configured outside a required-key posture.
///
/// Only its first [`KEY_LEN`] bytes are used, which keeps envelopes written by
/// development deployments of the previous system readable.
pub const DEVELOPMENT_DEFAULT_SECRET: &str = "default-key-change-in-production-32-chars";

/// Well-known placeholder secrets refused when a configured key is required.
const PLACEHOLDER_SECRETS: &[&str] = &[DEVELOPMENT_DEFAULT_SECRET, "change-me-in-production"];

const FINGERPRINT_LABEL: &[u8] = b"fieldseal key fingerprint v1";
const FINGERPRINT_LEN: usize = 8;

type HmacSha256 = Hmac<Sha256>;

/// Key settings supplied by the host's configuration layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyConfig {
    /// The configured secret string, if any.
    #[serde(default)]
    pub secret: Option<Secret<String>>,

    /// Refuse to fall back to the development default.
    #[serde(default)]
    pub require_configured_key: bool,
}

impl KeyConfig {
    /// Build a config from a plain secret string.
    pub fn with_secret(secret: impl Into<String>, require_configured_key: bool) -> Self {
        Self {
            secret: Some(Secret::new(secret.into())),
            require_configured_key,
        }
    }
}

/// Where the resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// The operator configured a secret.
    Configured,
    /// No secret was configured; the development default is in use.
    InsecureDefault,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeySource::Configured => "configured",
            KeySource::InsecureDefault => "insecure_default",
        }
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`KeyMaterial::resolve`].
#[derive(Debug)]
pub struct ResolvedKey {
    pub material: KeyMaterial,
    pub source: KeySource,
}

impl ResolvedKey {
    /// `true` when the host is running on the development default key and
    /// must not admit production traffic.
    pub fn is_insecure_default(&self) -> bool {
        self.source == KeySource::InsecureDefault
    }
}

/// Fixed-size AES-256 key.
///
/// Opaque to everything outside the crate: the bytes are only reachable by
/// the cipher engine. Zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Resolve the process key from `config`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingKey`] if no secret is set and one is required.
    /// - [`ConfigError::PlaceholderKey`] if a required secret is a placeholder.
    /// - [`ConfigError::KeyTooShort`] if the secret has fewer than [`KEY_LEN`] bytes.
    pub fn resolve(config: &KeyConfig) -> Result<ResolvedKey, ConfigError> {
        let configured = config
            .secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.trim().is_empty());

        let (secret, source) = match configured {
            Some(secret) => {
                if config.require_configured_key && PLACEHOLDER_SECRETS.contains(&secret) {
                    return Err(ConfigError::PlaceholderKey);
                }
                (secret, KeySource::Configured)
            }
            None if config.require_configured_key => return Err(ConfigError::MissingKey),
            None => {
                warn!("no encryption key configured; using the insecure development default");
                (DEVELOPMENT_DEFAULT_SECRET, KeySource::InsecureDefault)
            }
        };

        Ok(ResolvedKey {
            material: Self::from_secret(secret)?,
            source,
        })
    }

    /// Normalise a secret string to a key by taking its first [`KEY_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyTooShort`] if the secret is too short.
    pub fn from_secret(secret: &str) -> Result<Self, ConfigError> {
        let raw = secret.as_bytes();
        if raw.len() < KEY_LEN {
            return Err(ConfigError::KeyTooShort { actual: raw.len() });
        }
        Self::from_slice(&raw[..KEY_LEN])
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Wrap a raw key slice that must be exactly [`KEY_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKeyLength`] on any other length.
    pub fn from_slice(slice: &[u8]) -> Result<Self, ConfigError> {
        let bytes: [u8; KEY_LEN] = slice
            .try_into()
            .map_err(|_| ConfigError::InvalidKeyLength {
                actual: slice.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Short, non-reversible identifier for this key, safe to log.
    ///
    /// HMAC-SHA256 over a fixed label keyed by the key, truncated to
    /// 8 bytes and hex-encoded.
    pub fn fingerprint(&self) -> String {
        // HMAC accepts keys of any length.
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.bytes) else {
            return String::from("unavailable");
        };
        mac.update(FINGERPRINT_LABEL);
        let digest = mac.finalize().into_bytes();
        hex::encode(&digest[..FINGERPRINT_LEN])
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}
