//! [`FieldCipher`]: the entry point used by the persistence layer.
//!
//! Combines the cipher engine with the storage codec and routes every failed
//! read through the audit sink.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::audit::{AuditEvent, AuditSink, TracingAuditSink};
use crate::codec::{self, compact, StorageTriple};
use crate::crypto::{CipherEngine, EncryptionEnvelope};
use crate::error::{FormatError, SealError};
use crate::outcome::{FailureKind, FieldFailure, FieldOutcome};

/// Encrypts and decrypts optional text fields.
#[derive(Clone)]
pub struct FieldCipher {
    engine: CipherEngine,
    audit: Arc<dyn AuditSink>,
    key_fingerprint: Arc<str>,
}

impl FieldCipher {
    /// Create a cipher that audits through [`TracingAuditSink`].
    pub fn new(engine: CipherEngine) -> Self {
        Self::with_audit_sink(engine, Arc::new(TracingAuditSink))
    }

    pub fn with_audit_sink(engine: CipherEngine, audit: Arc<dyn AuditSink>) -> Self {
        let key_fingerprint = engine.key_fingerprint().into();
        Self {
            engine,
            audit,
            key_fingerprint,
        }
    }

    pub fn engine(&self) -> &CipherEngine {
        &self.engine
    }

    /// Encrypt an optional plaintext for storage.
    ///
    /// `None` yields `None` without touching the cipher; `Some("")` yields a
    /// real envelope.
    ///
    /// # Errors
    ///
    /// Propagates [`SealError`]; the caller must abort the write.
    pub fn encrypt(&self, plaintext: Option<&str>) -> Result<Option<StorageTriple>, SealError> {
        self.encrypt_with_context(plaintext, b"")
    }

    /// Like [`encrypt`](Self::encrypt), binding `aad` (e.g. the column name)
    /// into the tag.
    pub fn encrypt_with_context(
        &self,
        plaintext: Option<&str>,
        aad: &[u8],
    ) -> Result<Option<StorageTriple>, SealError> {
        Ok(self
            .seal_optional(plaintext, aad)?
            .as_ref()
            .map(codec::pack))
    }

    /// Encrypt to the single-column compact token.
    pub fn encrypt_compact(&self, plaintext: Option<&str>) -> Result<Option<String>, SealError> {
        Ok(self
            .seal_optional(plaintext, b"")?
            .as_ref()
            .map(compact::encode))
    }

    /// Decrypt a stored triple.
    pub fn decrypt(&self, stored: Option<&StorageTriple>) -> FieldOutcome {
        self.decrypt_with_context(stored, b"")
    }

    /// Like [`decrypt`](Self::decrypt) for values sealed with `aad`.
    pub fn decrypt_with_context(&self, stored: Option<&StorageTriple>, aad: &[u8]) -> FieldOutcome {
        let Some(triple) = stored else {
            return FieldOutcome::Absent;
        };
        match codec::unpack(triple) {
            Ok(envelope) => self.open_envelope(&envelope, aad),
            Err(e) => self.fail(FailureKind::Format, Some(triple.effective_version()), &e),
        }
    }

    /// Decrypt a stored JSON value as it appears in a record.
    ///
    /// `null` is [`FieldOutcome::Absent`]; anything that is not a storage
    /// triple object is a format failure.
    pub fn decrypt_value(&self, stored: &serde_json::Value) -> FieldOutcome {
        if stored.is_null() {
            return FieldOutcome::Absent;
        }
        match StorageTriple::deserialize(stored) {
            Ok(triple) => self.decrypt(Some(&triple)),
            Err(_) => self.fail(FailureKind::Format, None, &FormatError::MalformedTriple),
        }
    }

    /// Decrypt a compact token.
    pub fn decrypt_compact(&self, token: Option<&str>) -> FieldOutcome {
        let Some(token) = token else {
            return FieldOutcome::Absent;
        };
        match compact::decode(token) {
            Ok(envelope) => self.open_envelope(&envelope, b""),
            Err(e) => self.fail(FailureKind::Format, None, &e),
        }
    }

    fn seal_optional(
        &self,
        plaintext: Option<&str>,
        aad: &[u8],
    ) -> Result<Option<EncryptionEnvelope>, SealError> {
        plaintext
            .map(|p| self.engine.seal(p.as_bytes(), aad))
            .transpose()
    }

    fn open_envelope(&self, envelope: &EncryptionEnvelope, aad: &[u8]) -> FieldOutcome {
        let version = Some(envelope.algorithm().version());
        match self.engine.open(envelope, aad) {
            Ok(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => FieldOutcome::Ok(text.to_owned()),
                Err(_) => self.fail(FailureKind::Format, version, &FormatError::NotUtf8),
            },
            Err(e) => self.fail(FailureKind::Tamper, version, &e),
        }
    }

    fn fail(
        &self,
        kind: FailureKind,
        version: Option<u8>,
        reason: &dyn std::fmt::Display,
    ) -> FieldOutcome {
        let event = AuditEvent {
            id: Uuid::new_v4(),
            kind,
            version,
            key_fingerprint: self.key_fingerprint.to_string(),
            reason: reason.to_string(),
        };
        self.audit.record(&event);
        FieldOutcome::Failed(FieldFailure {
            kind,
            audit_id: event.id,
        })
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("algorithm", &self.engine.algorithm())
            .field("key_fingerprint", &self.key_fingerprint)
            .finish_non_exhaustive()
    }
}
