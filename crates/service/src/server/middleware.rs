//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, and response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest accepted request body. Records are small; large bodies are rejected
/// before any field is sealed.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
