//! Symmetric key resolution and handling.
//!
//! # Lifecycle
//!
//! 1. At startup the host builds a [`KeyConfig`] from its configuration source
//!    and calls [`KeyMaterial::resolve`] exactly once.
//! 2. The resolved [`KeyMaterial`] is wrapped in an `Arc` and handed to the
//!    cipher engine. It is never mutated afterwards.
//! 3. When the last handle is dropped the key bytes are zeroed.
//!
//! # Security invariants
//!
//! - Key bytes are **never** logged, formatted, or included in errors.
//! - A configured secret is truncated to [`KEY_LEN`] bytes, never padded or
//!   hashed. Changing that rule would orphan every stored envelope.
//! - With `require_configured_key` set, the development default is
//!   unreachable.

pub mod material;

pub use material::{KeyConfig, KeyMaterial, KeySource, ResolvedKey, KEY_LEN};
