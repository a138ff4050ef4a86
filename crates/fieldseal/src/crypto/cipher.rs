//! [`CipherEngine`]: seal and open individual field values.
//!
//! A random nonce is drawn from the OS CSPRNG on every seal. With 96-bit
//! nonces the collision probability stays negligible far beyond the volume a
//! single key will ever protect.

use std::sync::Arc;

use aes_gcm::aead::{
    consts::U16, rand_core::RngCore, AeadInPlace, KeyInit, Nonce, OsRng, Tag,
};
use aes_gcm::{aes::Aes256, Aes256Gcm, AesGcm};
use aes_gcm_siv::Aes256GcmSiv;
use zeroize::Zeroizing;

use crate::error::{ConfigError, SealError, TamperError};
use crate::key::{KeyMaterial, KEY_LEN};

use super::algorithm::{Algorithm, TAG_LEN};
use super::envelope::EncryptionEnvelope;

/// AES-256-GCM with the 16-byte IV used by the previous system.
type LegacyAes256Gcm = AesGcm<Aes256, U16>;

/// Authenticated encryption bound to one key.
///
/// Cheap to clone: the key is shared behind an `Arc` and never mutated.
#[derive(Clone, Debug)]
pub struct CipherEngine {
    key: Arc<KeyMaterial>,
    algorithm: Algorithm,
}

impl CipherEngine {
    /// Create an engine that seals with `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAlgorithm`] if `algorithm` is open-only.
    pub fn new(key: Arc<KeyMaterial>, algorithm: Algorithm) -> Result<Self, ConfigError> {
        if !algorithm.can_seal() {
            return Err(ConfigError::UnknownAlgorithm(algorithm.identifier().to_owned()));
        }
        Ok(Self { key, algorithm })
    }

    /// The algorithm new envelopes are sealed with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn key_fingerprint(&self) -> String {
        self.key.fingerprint()
    }

    /// Encrypt `plaintext`, binding `aad` into the tag.
    ///
    /// # Errors
    ///
    /// Returns [`SealError::Aead`] only if the plaintext exceeds the AEAD's
    /// length limit.
    pub fn seal(&self, plaintext: &[u8], aad: &[u8]) -> Result<EncryptionEnvelope, SealError> {
        seal_envelope(&self.key, self.algorithm, plaintext, aad)
    }

    /// Verify and decrypt `envelope` with the algorithm it was sealed under.
    ///
    /// The returned buffer is zeroed when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TamperError`] if authentication fails for any reason.
    pub fn open(
        &self,
        envelope: &EncryptionEnvelope,
        aad: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, TamperError> {
        let mut buffer = Zeroizing::new(envelope.ciphertext().to_vec());
        let nonce = envelope.nonce();
        let tag = envelope.auth_tag();
        match envelope.algorithm() {
            Algorithm::LegacyAes256Gcm => {
                open_in_place::<LegacyAes256Gcm>(&self.key, nonce, aad, &mut buffer, tag)?
            }
            Algorithm::Aes256Gcm => {
                open_in_place::<Aes256Gcm>(&self.key, nonce, aad, &mut buffer, tag)?
            }
            Algorithm::Aes256GcmSiv => {
                open_in_place::<Aes256GcmSiv>(&self.key, nonce, aad, &mut buffer, tag)?
            }
        }
        Ok(buffer)
    }
}

/// Seal with an explicit algorithm, including open-only ones.
pub(crate) fn seal_envelope(
    key: &KeyMaterial,
    algorithm: Algorithm,
    plaintext: &[u8],
    aad: &[u8],
) -> Result<EncryptionEnvelope, SealError> {
    let mut nonce = vec![0u8; algorithm.nonce_len()];
    OsRng.fill_bytes(&mut nonce);

    // Encrypted in place; zeroed on drop if sealing fails half way.
    let mut buffer = Zeroizing::new(plaintext.to_vec());
    let tag = match algorithm {
        Algorithm::LegacyAes256Gcm => {
            seal_in_place::<LegacyAes256Gcm>(key, &nonce, aad, &mut buffer)?
        }
        Algorithm::Aes256Gcm => seal_in_place::<Aes256Gcm>(key, &nonce, aad, &mut buffer)?,
        Algorithm::Aes256GcmSiv => seal_in_place::<Aes256GcmSiv>(key, &nonce, aad, &mut buffer)?,
    };
    let ciphertext = std::mem::take(&mut *buffer);

    EncryptionEnvelope::new(algorithm, nonce, ciphertext, &tag).map_err(|_| SealError::Aead)
}

fn seal_in_place<C>(
    key: &KeyMaterial,
    nonce: &[u8],
    aad: &[u8],
    buffer: &mut [u8],
) -> Result<[u8; TAG_LEN], SealError>
where
    C: KeyInit + AeadInPlace<TagSize = U16>,
{
    let cipher = C::new_from_slice(key.as_bytes())
        .map_err(|_| ConfigError::InvalidKeyLength { actual: KEY_LEN })?;
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<C>::from_slice(nonce), aad, buffer)
        .map_err(|_| SealError::Aead)?;

    let mut out = [0u8; TAG_LEN];
    out.copy_from_slice(&tag);
    Ok(out)
}

fn open_in_place<C>(
    key: &KeyMaterial,
    nonce: &[u8],
    aad: &[u8],
    buffer: &mut [u8],
    tag: &[u8; TAG_LEN],
) -> Result<(), TamperError>
where
    C: KeyInit + AeadInPlace<TagSize = U16>,
{
    let cipher = C::new_from_slice(key.as_bytes()).map_err(|_| TamperError)?;
    cipher
        .decrypt_in_place_detached(
            Nonce::<C>::from_slice(nonce),
            aad,
            buffer,
            Tag::<C>::from_slice(tag),
        )
        .map_err(|_| TamperError)
}
