//! AEAD configurations and their stored version tags.

use crate::error::ConfigError;

/// Byte length of the nonce for the current algorithms (96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the IV written by the previous system (128 bits).
pub const LEGACY_NONCE_LEN: usize = 16;

/// Byte length of the authentication tag for every algorithm (128 bits).
pub const TAG_LEN: usize = 16;

/// An AEAD configuration. Selected once per process for sealing; envelopes
/// carry their own so they can be opened after the default changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// AES-256-GCM with a random 16-byte IV and no stored version tag.
    LegacyAes256Gcm,
    /// AES-256-GCM with a random 12-byte nonce.
    Aes256Gcm,
    /// AES-256-GCM-SIV with a random 12-byte nonce.
    Aes256GcmSiv,
}

impl Algorithm {
    /// The algorithm used when none is configured.
    pub const DEFAULT: Algorithm = Algorithm::Aes256Gcm;

    /// Parse a configured algorithm identifier.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. The
    /// legacy format cannot be selected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAlgorithm`] for anything else.
    pub fn from_identifier(identifier: &str) -> Result<Self, ConfigError> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "aes-256-gcm" => Ok(Algorithm::Aes256Gcm),
            "aes-256-gcm-siv" => Ok(Algorithm::Aes256GcmSiv),
            _ => Err(ConfigError::UnknownAlgorithm(identifier.to_owned())),
        }
    }

    /// Look up the algorithm for a stored version tag.
    pub fn from_version(version: u8) -> Option<Self> {
        match version {
            0 => Some(Algorithm::LegacyAes256Gcm),
            1 => Some(Algorithm::Aes256Gcm),
            2 => Some(Algorithm::Aes256GcmSiv),
            _ => None,
        }
    }

    /// The one-byte tag stored alongside every envelope.
    pub fn version(&self) -> u8 {
        match self {
            Algorithm::LegacyAes256Gcm => 0,
            Algorithm::Aes256Gcm => 1,
            Algorithm::Aes256GcmSiv => 2,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Algorithm::LegacyAes256Gcm => "aes-256-gcm-iv16",
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::Aes256GcmSiv => "aes-256-gcm-siv",
        }
    }

    pub fn nonce_len(&self) -> usize {
        match self {
            Algorithm::LegacyAes256Gcm => LEGACY_NONCE_LEN,
            Algorithm::Aes256Gcm | Algorithm::Aes256GcmSiv => NONCE_LEN,
        }
    }

    /// Whether new envelopes may be produced with this algorithm.
    pub fn can_seal(&self) -> bool {
        !matches!(self, Algorithm::LegacyAes256Gcm)
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        assert_eq!(
            Algorithm::from_identifier("aes-256-gcm").unwrap(),
            Algorithm::Aes256Gcm
        );
        assert_eq!(
            Algorithm::from_identifier(" AES-256-GCM-SIV ").unwrap(),
            Algorithm::Aes256GcmSiv
        );
    }

    #[test]
    fn rejects_unknown_and_legacy_identifiers() {
        assert!(Algorithm::from_identifier("chacha20-poly1305").is_err());
        assert!(Algorithm::from_identifier("aes-256-gcm-iv16").is_err());
        assert!(Algorithm::from_identifier("").is_err());
    }

    #[test]
    fn version_tags_are_stable() {
        for alg in [
            Algorithm::LegacyAes256Gcm,
            Algorithm::Aes256Gcm,
            Algorithm::Aes256GcmSiv,
        ] {
            assert_eq!(Algorithm::from_version(alg.version()), Some(alg));
        }
        assert_eq!(Algorithm::Aes256Gcm.version(), 1);
        assert_eq!(Algorithm::from_version(9), None);
    }

    #[test]
    fn nonce_lengths() {
        assert_eq!(Algorithm::Aes256Gcm.nonce_len(), 12);
        assert_eq!(Algorithm::Aes256GcmSiv.nonce_len(), 12);
        assert_eq!(Algorithm::LegacyAes256Gcm.nonce_len(), 16);
    }

    #[test]
    fn legacy_is_open_only() {
        assert!(!Algorithm::LegacyAes256Gcm.can_seal());
        assert!(Algorithm::default().can_seal());
    }
}
