//! AEAD field encryption primitives.
//!
//! This module is free of storage and encoding concerns. It turns plaintext
//! bytes into an [`EncryptionEnvelope`] and back, using a key handed in by
//! the caller.
//!
//! # Algorithms
//!
//! | version | algorithm | nonce | tag | sealing |
//! |---|---|---|---|---|
//! | 0 | AES-256-GCM, legacy 16-byte IV | 16 | 16 | open only |
//! | 1 | AES-256-GCM | 12 | 16 | default |
//! | 2 | AES-256-GCM-SIV (RFC 8452) | 12 | 16 | yes |
//!
//! **Never derive nonces from the plaintext or a restartable counter.** GCM
//! nonce reuse breaks both confidentiality and authentication.

pub mod algorithm;
pub mod cipher;
pub mod envelope;

pub use algorithm::{Algorithm, LEGACY_NONCE_LEN, NONCE_LEN, TAG_LEN};
pub use cipher::CipherEngine;
pub use envelope::EncryptionEnvelope;
