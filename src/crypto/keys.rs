//! Environment key pairs (X25519, 32 bytes per half).
//!
//! Each environment owns exactly one `KeyPair`.  The public half is
//! enough to add or change secrets; the private half is needed to read
//! them back.

use std::fmt;

use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use super::codec;
use crate::errors::{Result, UntoldError};

/// Length of each half of a key pair in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// A public/private key pair for one environment.
///
/// The private key wipes its memory when dropped.
pub struct KeyPair {
    public: PublicKey,
    private: SecretKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let private = SecretKey::generate(&mut OsRng);
        Self {
            public: private.public_key(),
            private,
        }
    }

    /// Assemble a key pair from halves loaded separately.
    ///
    /// The halves are not checked against each other here; a mismatch
    /// surfaces as a decryption failure when a secret is opened.
    pub fn from_parts(public: PublicKey, private: SecretKey) -> Self {
        Self { public, private }
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    pub fn private(&self) -> &SecretKey {
        &self.private
    }

    /// Base64 text of the public key, as stored in `<env>.public`.
    pub fn encode_public(&self) -> String {
        codec::encode(self.public.as_bytes())
    }

    /// Base64 text of the private key, as stored in `<env>.private`.
    pub fn encode_private(&self) -> Zeroizing<String> {
        let bytes = Zeroizing::new(self.private.to_bytes());
        Zeroizing::new(codec::encode(&bytes[..]))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.encode_public())
            .finish_non_exhaustive()
    }
}

/// Decode base64 key text and insist on exactly 32 bytes.
///
/// Any other length is a hard error; keys are never truncated or padded.
pub fn decode_key(text: &str) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let bytes = Zeroizing::new(codec::decode(text)?);
    let key: [u8; KEY_LEN] =
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| UntoldError::CorruptedKey {
                expected: KEY_LEN,
                actual: bytes.len(),
            })?;
    Ok(Zeroizing::new(key))
}

/// Decode the contents of a `.public` file.
pub fn decode_public_key(text: &str) -> Result<PublicKey> {
    let bytes = decode_key(text)?;
    Ok(PublicKey::from(*bytes))
}

/// Decode the contents of a `.private` file or the key environment variable.
pub fn decode_private_key(text: &str) -> Result<SecretKey> {
    let bytes = decode_key(text)?;
    Ok(SecretKey::from(*bytes))
}
