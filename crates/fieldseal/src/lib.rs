//! Field-level authenticated encryption for sensitive record columns.
//!
//! The pipeline has three parts:
//!
//! - [`key`] resolves the process key once at startup ([`KeyMaterial`]).
//! - [`crypto`] seals and opens values with an AEAD ([`CipherEngine`]).
//! - [`codec`] turns envelopes into storable text ([`StorageTriple`]).
//!
//! [`FieldCipher`] ties them together for the persistence layer and reports
//! unreadable fields through an [`AuditSink`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use fieldseal::{Algorithm, CipherEngine, FieldCipher, KeyConfig, KeyMaterial};
//!
//! let resolved = KeyMaterial::resolve(&KeyConfig::with_secret(secret, true))?;
//! let engine = CipherEngine::new(Arc::new(resolved.material), Algorithm::default())?;
//! let fields = FieldCipher::new(engine);
//!
//! let stored = fields.encrypt(Some("patient reports improved mood"))?;
//! let notes = fields.decrypt(stored.as_ref()).into_option();
//! ```

pub mod audit;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod field;
pub mod key;
pub mod outcome;

pub use audit::{AuditEvent, AuditSink, TracingAuditSink};
pub use codec::StorageTriple;
pub use crypto::{Algorithm, CipherEngine, EncryptionEnvelope};
pub use error::{ConfigError, FormatError, SealError, TamperError};
pub use field::FieldCipher;
pub use key::{KeyConfig, KeyMaterial, KeySource, ResolvedKey};
pub use outcome::{FailureKind, FieldFailure, FieldOutcome};
