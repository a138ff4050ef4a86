//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use fieldseal::{FieldCipher, KeySource};

/// Application state shared across all request handlers.
///
/// The field cipher is `Arc`-wrapped so Axum can clone the state for each
/// request without copying key material.
#[derive(Clone)]
pub struct AppState {
    /// Field encryption bound to the process-wide key.
    pub fields: Arc<FieldCipher>,
    /// Where the key came from; reported by the health check.
    pub key_source: KeySource,
}

impl AppState {
    /// Create a new [`AppState`] around a ready field cipher.
    pub fn new(fields: FieldCipher, key_source: KeySource) -> Self {
        Self {
            fields: Arc::new(fields),
            key_source,
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Creates an [`AppState`] with a fixed configured key, suitable for tests.
    fn default() -> Self {
        use fieldseal::{key::KEY_LEN, Algorithm, CipherEngine, KeyMaterial};

        let key = Arc::new(KeyMaterial::from_bytes([0x42; KEY_LEN]));
        let engine = CipherEngine::new(key, Algorithm::DEFAULT).unwrap();
        Self::new(FieldCipher::new(engine), KeySource::Configured)
    }
}
