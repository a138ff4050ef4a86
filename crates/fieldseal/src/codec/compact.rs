//! Single-column token form of an envelope.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::crypto::{Algorithm, EncryptionEnvelope};
use crate::error::{EnvelopePart, FormatError};

/// Encode an envelope as `v<version>.<nonce>.<ciphertext>.<tag>`.
pub fn encode(envelope: &EncryptionEnvelope) -> String {
    format!(
        "v{}.{}.{}.{}",
        envelope.algorithm().version(),
        URL_SAFE_NO_PAD.encode(envelope.nonce()),
        URL_SAFE_NO_PAD.encode(envelope.ciphertext()),
        URL_SAFE_NO_PAD.encode(envelope.auth_tag()),
    )
}

/// Parse a compact token back into an [`EncryptionEnvelope`].
///
/// # Errors
///
/// Returns [`FormatError::MalformedToken`] if the token does not have four
/// dot-separated parts with a `v<n>` prefix, and the usual encoding, version
/// and length errors otherwise.
pub fn decode(token: &str) -> Result<EncryptionEnvelope, FormatError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [version, nonce, ciphertext, tag] = parts.as_slice() else {
        return Err(FormatError::MalformedToken);
    };

    let version: u8 = version
        .strip_prefix('v')
        .and_then(|v| v.parse().ok())
        .ok_or(FormatError::MalformedToken)?;
    let algorithm = Algorithm::from_version(version).ok_or(FormatError::UnknownVersion(version))?;

    let nonce = decode_b64(nonce, EnvelopePart::Nonce)?;
    let tag = decode_b64(tag, EnvelopePart::AuthTag)?;
    let ciphertext = decode_b64(ciphertext, EnvelopePart::Ciphertext)?;

    EncryptionEnvelope::new(algorithm, nonce, ciphertext, &tag)
}

fn decode_b64(value: &str, part: EnvelopePart) -> Result<Vec<u8>, FormatError> {
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|_| FormatError::InvalidEncoding(part))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> EncryptionEnvelope {
        EncryptionEnvelope::new(Algorithm::Aes256GcmSiv, vec![3; 12], b"hello".to_vec(), &[4; 16])
            .unwrap()
    }

    #[test]
    fn token_has_version_prefix() {
        let token = encode(&envelope());
        assert!(token.starts_with("v2."), "got: {token}");
        assert_eq!(token.split('.').count(), 4);
    }

    #[test]
    fn token_decodes_to_same_envelope() {
        let token = encode(&envelope());
        assert_eq!(decode(&token).unwrap(), envelope());
    }

    #[test]
    fn empty_ciphertext_token() {
        let env =
            EncryptionEnvelope::new(Algorithm::Aes256Gcm, vec![0; 12], Vec::new(), &[0; 16])
                .unwrap();
        let token = encode(&env);
        assert!(token.contains(".."));
        assert!(decode(&token).unwrap().ciphertext().is_empty());
    }

    #[test]
    fn rejects_bad_prefix() {
        assert_eq!(decode("x1.a.b.c").unwrap_err(), FormatError::MalformedToken);
        assert_eq!(decode("v.a.b.c").unwrap_err(), FormatError::MalformedToken);
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert_eq!(decode("v1.abc").unwrap_err(), FormatError::MalformedToken);
        assert_eq!(decode("v1.a.b.c.d").unwrap_err(), FormatError::MalformedToken);
    }

    #[test]
    fn rejects_unknown_version() {
        assert_eq!(decode("v7.a.b.c").unwrap_err(), FormatError::UnknownVersion(7));
    }

    #[test]
    fn rejects_bad_base64() {
        assert_eq!(
            decode("v1.!!!.abc.def").unwrap_err(),
            FormatError::InvalidEncoding(EnvelopePart::Nonce)
        );
    }
}
