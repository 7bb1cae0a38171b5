//! Cryptographic primitives for untold.
//!
//! This module provides:
//! - Unpadded base64 text encoding for keys and ciphertext (`codec`)
//! - X25519 environment key pairs (`keys`)
//! - Sealed-box encryption and decryption (`sealed`)

pub mod codec;
pub mod keys;
pub mod sealed;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, KeyPair, ...};
pub use keys::{decode_key, decode_private_key, decode_public_key, KeyPair, KEY_LEN};
pub use sealed::{open, seal};
