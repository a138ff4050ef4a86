//! Tracing setup: structured JSON logs plus optional OTLP trace export.
//!
//! # Telemetry invariants
//!
//! - **No plaintext field values or key material** may appear in any span
//!   attribute or log field. Keys are identified by fingerprint only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).
//! - Unreadable-field audit events are emitted on the `fieldseal::audit`
//!   target so they can be routed separately.

pub mod init;

pub use init::init_telemetry;
