//! Mapping from secret names to file names.
//!
//! A secret is stored under the lowercase hex MD5 of its UTF-8 name.  The
//! hash keeps (possibly sensitive) names out of the directory listing,
//! is always filesystem-safe, and lets `get` and `put` agree on a location
//! without an index file.  MD5 is used purely as a fast, fixed-width
//! name hash, never for integrity.  Two names colliding is not handled.

use std::fmt;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 16;

/// The on-disk identifier of a secret name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecretAddress([u8; ADDRESS_LEN]);

impl SecretAddress {
    /// Compute the address of `name`.  Same name, same address, always.
    pub fn of(name: &str) -> Self {
        Self(md5::compute(name.as_bytes()).0)
    }

    /// The file name used inside the environment directory.
    pub fn file_name(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for SecretAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
