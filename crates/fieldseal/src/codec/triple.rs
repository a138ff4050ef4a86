//! [`StorageTriple`]: the hex-encoded columns persisted for each protected field.

use serde::{Deserialize, Serialize};

use crate::crypto::{Algorithm, EncryptionEnvelope, TAG_LEN};
use crate::error::{EnvelopePart, FormatError};

/// Envelope rendered as independently encoded text fields.
///
/// Legacy rows name the ciphertext `encrypted` and the nonce `iv`; both
/// spellings are accepted on read, and the current names are always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageTriple {
    #[serde(alias = "encrypted")]
    pub ciphertext: String,
    #[serde(alias = "iv")]
    pub nonce: String,
    pub auth_tag: String,
    /// Algorithm version tag. `None` marks a legacy row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
}

impl StorageTriple {
    /// The version this triple will be decoded as.
    pub fn effective_version(&self) -> u8 {
        self.version
            .unwrap_or(Algorithm::LegacyAes256Gcm.version())
    }
}

/// Render an envelope for storage.
pub fn pack(envelope: &EncryptionEnvelope) -> StorageTriple {
    let algorithm = envelope.algorithm();
    StorageTriple {
        ciphertext: hex::encode(envelope.ciphertext()),
        nonce: hex::encode(envelope.nonce()),
        auth_tag: hex::encode(envelope.auth_tag()),
        // Legacy rows never carried a version; keep writing them that way.
        version: (algorithm != Algorithm::LegacyAes256Gcm).then(|| algorithm.version()),
    }
}

/// Decode a stored triple back into an envelope.
///
/// Every length is checked here so a malformed row is reported as a
/// [`FormatError`] and never reaches the cipher.
///
/// # Errors
///
/// Returns [`FormatError`] on unknown version, bad hex, or a nonce/tag of the
/// wrong length.
pub fn unpack(triple: &StorageTriple) -> Result<EncryptionEnvelope, FormatError> {
    let version = triple.effective_version();
    let algorithm = Algorithm::from_version(version).ok_or(FormatError::UnknownVersion(version))?;

    let nonce = decode_hex(&triple.nonce, EnvelopePart::Nonce)?;
    if nonce.len() != algorithm.nonce_len() {
        return Err(FormatError::InvalidLength {
            part: EnvelopePart::Nonce,
            expected: algorithm.nonce_len(),
            actual: nonce.len(),
        });
    }
    let auth_tag = decode_hex(&triple.auth_tag, EnvelopePart::AuthTag)?;
    if auth_tag.len() != TAG_LEN {
        return Err(FormatError::tag_length(auth_tag.len()));
    }
    let ciphertext = decode_hex(&triple.ciphertext, EnvelopePart::Ciphertext)?;

    EncryptionEnvelope::new(algorithm, nonce, ciphertext, &auth_tag)
}

/// [`pack`] lifted over an optional value: `None` stays `None`.
pub fn pack_optional(envelope: Option<&EncryptionEnvelope>) -> Option<StorageTriple> {
    envelope.map(pack)
}

/// [`unpack`] lifted over an optional value: `None` stays `None`.
///
/// # Errors
///
/// See [`unpack`].
pub fn unpack_optional(
    triple: Option<&StorageTriple>,
) -> Result<Option<EncryptionEnvelope>, FormatError> {
    triple.map(unpack).transpose()
}

fn decode_hex(value: &str, part: EnvelopePart) -> Result<Vec<u8>, FormatError> {
    hex::decode(value).map_err(|_| FormatError::InvalidEncoding(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_envelope() -> EncryptionEnvelope {
        EncryptionEnvelope::new(
            Algorithm::Aes256Gcm,
            vec![0xAA; 12],
            vec![0x01, 0x02, 0xFE],
            &[0x0F; 16],
        )
        .unwrap()
    }

    fn sample_triple() -> StorageTriple {
        pack(&sample_envelope())
    }

    #[test]
    fn pack_renders_lowercase_hex() {
        let triple = sample_triple();
        assert_eq!(triple.ciphertext, "0102fe");
        assert_eq!(triple.nonce, "aa".repeat(12));
        assert_eq!(triple.auth_tag, "0f".repeat(16));
        assert_eq!(triple.version, Some(1));
    }

    #[test]
    fn unpack_restores_envelope() {
        assert_eq!(unpack(&sample_triple()).unwrap(), sample_envelope());
    }

    #[test]
    fn unpack_accepts_uppercase_hex() {
        let mut triple = sample_triple();
        triple.ciphertext = triple.ciphertext.to_uppercase();
        assert_eq!(unpack(&triple).unwrap().ciphertext(), &[0x01, 0x02, 0xFE]);
    }

    #[test]
    fn serde_uses_camel_case_auth_tag() {
        let json = serde_json::to_value(sample_triple()).unwrap();
        assert!(json.get("authTag").is_some());
        assert_eq!(json["version"], 1);
    }

    #[test]
    fn legacy_triple_without_version_deserialises() {
        let json = serde_json::json!({
            "ciphertext": "00",
            "nonce": "11".repeat(16),
            "authTag": "22".repeat(16),
        });
        let triple: StorageTriple = serde_json::from_value(json).unwrap();
        assert_eq!(triple.version, None);
        let env = unpack(&triple).unwrap();
        assert_eq!(env.algorithm(), Algorithm::LegacyAes256Gcm);
    }

    #[test]
    fn legacy_field_names_deserialise() {
        let json = serde_json::json!({
            "encrypted": "00",
            "iv": "11".repeat(16),
            "authTag": "22".repeat(16),
        });
        let triple: StorageTriple = serde_json::from_value(json).unwrap();
        assert_eq!(triple.ciphertext, "00");
        assert_eq!(triple.nonce, "11".repeat(16));
        assert_eq!(unpack(&triple).unwrap().algorithm(), Algorithm::LegacyAes256Gcm);

        let written = serde_json::to_value(&triple).unwrap();
        assert!(written.get("ciphertext").is_some());
        assert!(written.get("encrypted").is_none());
    }

    #[test]
    fn legacy_envelope_packs_without_version() {
        let env = EncryptionEnvelope::new(
            Algorithm::LegacyAes256Gcm,
            vec![0; 16],
            vec![1],
            &[0; 16],
        )
        .unwrap();
        let triple = pack(&env);
        assert_eq!(triple.version, None);
        assert!(!serde_json::to_string(&triple).unwrap().contains("version"));
    }

    #[test]
    fn unpack_rejects_bad_hex() {
        let mut triple = sample_triple();
        triple.ciphertext = "zz".into();
        assert_eq!(
            unpack(&triple).unwrap_err(),
            FormatError::InvalidEncoding(EnvelopePart::Ciphertext)
        );
    }

    #[test]
    fn unpack_rejects_odd_length_hex() {
        let mut triple = sample_triple();
        triple.nonce.push('a');
        assert_eq!(
            unpack(&triple).unwrap_err(),
            FormatError::InvalidEncoding(EnvelopePart::Nonce)
        );
    }

    #[test]
    fn unpack_rejects_short_nonce() {
        let mut triple = sample_triple();
        triple.nonce = "aa".repeat(8);
        assert_eq!(
            unpack(&triple).unwrap_err(),
            FormatError::InvalidLength {
                part: EnvelopePart::Nonce,
                expected: 12,
                actual: 8,
            }
        );
    }

    #[test]
    fn unpack_rejects_short_tag() {
        let mut triple = sample_triple();
        triple.auth_tag = "0f".repeat(12);
        assert_eq!(unpack(&triple).unwrap_err(), FormatError::tag_length(12));
    }

    #[test]
    fn unpack_rejects_unknown_version() {
        let mut triple = sample_triple();
        triple.version = Some(42);
        assert_eq!(unpack(&triple).unwrap_err(), FormatError::UnknownVersion(42));
    }

    #[test]
    fn optional_helpers_pass_none_through() {
        assert_eq!(pack_optional(None), None);
        assert_eq!(unpack_optional(None).unwrap(), None);
        let env = sample_envelope();
        let packed = pack_optional(Some(&env)).unwrap();
        assert_eq!(unpack_optional(Some(&packed)).unwrap(), Some(env));
    }
}
