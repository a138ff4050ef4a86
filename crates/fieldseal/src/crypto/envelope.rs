//! [`EncryptionEnvelope`]: one encrypted value.

use crate::error::{EnvelopePart, FormatError};

use super::algorithm::{Algorithm, TAG_LEN};

/// Ciphertext, nonce and authentication tag of a single sealed value, plus
/// the algorithm that produced them.
///
/// Fields are private: an envelope always has a nonce of its algorithm's
/// length and a full-length tag, so the cipher never sees malformed input.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionEnvelope {
    algorithm: Algorithm,
    nonce: Vec<u8>,
    ciphertext: Vec<u8>,
    auth_tag: [u8; TAG_LEN],
}

impl EncryptionEnvelope {
    /// Assemble an envelope from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidLength`] if the nonce or tag length does
    /// not match `algorithm`.
    pub fn new(
        algorithm: Algorithm,
        nonce: Vec<u8>,
        ciphertext: Vec<u8>,
        auth_tag: &[u8],
    ) -> Result<Self, FormatError> {
        if nonce.len() != algorithm.nonce_len() {
            return Err(FormatError::InvalidLength {
                part: EnvelopePart::Nonce,
                expected: algorithm.nonce_len(),
                actual: nonce.len(),
            });
        }
        let auth_tag: [u8; TAG_LEN] = auth_tag
            .try_into()
            .map_err(|_| FormatError::tag_length(auth_tag.len()))?;

        Ok(Self {
            algorithm,
            nonce,
            ciphertext,
            auth_tag,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn auth_tag(&self) -> &[u8; TAG_LEN] {
        &self.auth_tag
    }
}

impl std::fmt::Debug for EncryptionEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionEnvelope")
            .field("algorithm", &self.algorithm)
            .field("nonce_len", &self.nonce.len())
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}
