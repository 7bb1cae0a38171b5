//! Anonymous public-key encryption (NaCl/libsodium "sealed box").
//!
//! The sender generates an ephemeral X25519 key for every message, so it
//! needs no key pair of its own.  Only the holder of the recipient's
//! private key can open the box.
//!
//! Layout of the returned byte buffer:
//!   [ 32-byte ephemeral public key | XSalsa20-Poly1305 ciphertext + 16-byte tag ]

use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey};
use subtle::ConstantTimeEq;

use crate::errors::{Result, UntoldError};

/// Bytes a sealed box adds on top of the plaintext (ephemeral key + tag).
pub const SEAL_OVERHEAD: usize = 32 + 16;

/// Seal `plaintext` so only the owner of `recipient` can read it.
pub fn seal(plaintext: &[u8], recipient: &PublicKey) -> Result<Vec<u8>> {
    recipient
        .seal(&mut OsRng, plaintext)
        .map_err(|e| UntoldError::EncryptionFailed(format!("sealed box error: {e}")))
}

/// Open a sealed box with the recipient's key pair.
///
/// Fails closed: a truncated or tampered box, or a `public` key that does
/// not belong to `private`, all yield `DecryptionFailed` and no plaintext.
pub fn open(ciphertext: &[u8], public: &PublicKey, private: &SecretKey) -> Result<Vec<u8>> {
    if ciphertext.len() < SEAL_OVERHEAD {
        return Err(UntoldError::DecryptionFailed);
    }

    // The box nonce is derived from the recipient public key, so a
    // mismatched pair can never authenticate.  Reject it up front.
    let derived = private.public_key();
    if !bool::from(derived.as_bytes().ct_eq(public.as_bytes())) {
        return Err(UntoldError::DecryptionFailed);
    }

    private
        .unseal(ciphertext)
        .map_err(|_| UntoldError::DecryptionFailed)
}
