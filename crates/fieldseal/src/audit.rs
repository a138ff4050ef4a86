//! Audit signal for unreadable protected fields.
//!
//! Every failed read produces exactly one [`AuditEvent`]. Events identify the
//! key by fingerprint and the failure by kind; they never carry plaintext,
//! ciphertext, or key bytes.

use tracing::warn;
use uuid::Uuid;

use crate::outcome::FailureKind;

/// `tracing` target used by [`TracingAuditSink`].
pub const AUDIT_TARGET: &str = "fieldseal::audit";

/// One unreadable-field event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub id: Uuid,
    pub kind: FailureKind,
    /// Envelope version, when it could be determined.
    pub version: Option<u8>,
    pub key_fingerprint: String,
    /// Safe description of the error.
    pub reason: String,
}

/// Destination for audit events.
#[cfg_attr(test, mockall::automock)]
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

/// Emits audit events as structured `warn` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        warn!(
            target: AUDIT_TARGET,
            audit_id = %event.id,
            kind = event.kind.as_str(),
            version = ?event.version,
            key_fingerprint = %event.key_fingerprint,
            reason = %event.reason,
            "protected field unreadable"
        );
    }
}
