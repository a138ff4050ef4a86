//! [`FieldOutcome`]: the tagged result of reading a protected field.

use uuid::Uuid;

/// Why a stored field could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Authentication failed: wrong key or altered data.
    Tamper,
    /// The stored value is not a well-formed envelope.
    Format,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Tamper => "tamper",
            FailureKind::Format => "format",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detail of a failed read. `audit_id` matches the emitted audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldFailure {
    pub kind: FailureKind,
    pub audit_id: Uuid,
}

/// Result of decrypting a stored field.
///
/// Keeps "never set" apart from "unreadable". Presenting `Failed` to end
/// users as a generic "data unavailable" is up to the caller.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// No value was stored.
    Absent,
    /// The decrypted plaintext.
    Ok(String),
    /// The stored value exists but could not be decrypted.
    Failed(FieldFailure),
}

impl FieldOutcome {
    /// Collapse to the external null-on-failure contract.
    ///
    /// The failure has already been audited by the time this is called.
    pub fn into_option(self) -> Option<String> {
        match self {
            FieldOutcome::Ok(plaintext) => Some(plaintext),
            FieldOutcome::Absent | FieldOutcome::Failed(_) => None,
        }
    }

    pub fn as_plaintext(&self) -> Option<&str> {
        match self {
            FieldOutcome::Ok(plaintext) => Some(plaintext),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FieldFailure> {
        match self {
            FieldOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldOutcome::Absent)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FieldOutcome::Failed(_))
    }
}

impl std::fmt::Debug for FieldOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldOutcome::Absent => f.write_str("Absent"),
            // Never print plaintext.
            FieldOutcome::Ok(plaintext) => write!(f, "Ok(<{} bytes>)", plaintext.len()),
            FieldOutcome::Failed(failure) => f.debug_tuple("Failed").field(failure).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_option_collapses_absent_and_failed() {
        let failed = FieldOutcome::Failed(FieldFailure {
            kind: FailureKind::Tamper,
            audit_id: Uuid::new_v4(),
        });
        assert_eq!(failed.into_option(), None);
        assert_eq!(FieldOutcome::Absent.into_option(), None);
        assert_eq!(
            FieldOutcome::Ok("calm".into()).into_option(),
            Some("calm".to_owned())
        );
    }

    #[test]
    fn debug_redacts_plaintext() {
        let printed = format!("{:?}", FieldOutcome::Ok("felt unsafe last night".into()));
        assert_eq!(printed, "Ok(<22 bytes>)");
    }

    #[test]
    fn predicates() {
        assert!(FieldOutcome::Absent.is_absent());
        let failed = FieldOutcome::Failed(FieldFailure {
            kind: FailureKind::Format,
            audit_id: Uuid::nil(),
        });
        assert!(failed.is_failed());
        assert_eq!(failed.failure().unwrap().kind, FailureKind::Format);
        assert_eq!(failed.as_plaintext(), None);
    }
}
