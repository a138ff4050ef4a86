//! Storage encoding of encryption envelopes.
//!
//! # Storage format
//!
//! ```text
//! { "ciphertext": "<hex>", "nonce": "<hex>", "authTag": "<hex>", "version": 1 }
//! ```
//!
//! Hex is lowercase on write; either case is accepted on read. A triple with
//! no `version` was written by the previous system and is read as version 0.
//! An absent plaintext is stored as `null`, never as an envelope.
//!
//! The compact form packs the same data into one column:
//!
//! ```text
//! v<version>.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext)>.<base64url-no-pad(tag)>
//! ```

pub mod compact;
pub mod triple;

pub use triple::{pack, pack_optional, unpack, unpack_optional, StorageTriple};
