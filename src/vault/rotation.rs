//! Key rotation for one environment.
//!
//! Ordering:
//!   1. Decrypt **every** secret under the old key pair into memory.
//!   2. Generate the new key pair.
//!   3. Re-seal each secret under the new public key, overwriting its file.
//!   4. (caller) Overwrite `<env>.public` / `<env>.private`.
//!
//! Nothing is written until step 1 has fully succeeded, so a bad secret
//! aborts the rotation with the environment untouched.
//!
//! Rotation is NOT atomic across files.  If the process dies, or a write
//! fails, after step 3 has started but before step 4 finishes, some or all
//! secrets are sealed under a key that is not on disk and cannot be
//! recovered with the stored key files.  There is no recovery log.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use crate::crypto::KeyPair;
use crate::errors::Result;

use super::store::SecretStore;

/// Outcome of a successful rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationReport {
    pub environment: String,
    /// Number of secrets re-encrypted.
    pub secrets: usize,
}

/// Re-encrypt every secret in `store` under a freshly generated key pair.
///
/// Returns the new key pair and the number of secrets rewritten.  The
/// caller must persist the new key pair last.
pub fn rotate_environment(store: &SecretStore, old: &KeyPair) -> Result<(KeyPair, usize)> {
    let files = store.list_files()?;

    let mut values: BTreeMap<String, Zeroizing<String>> = BTreeMap::new();
    for file_name in files {
        let value = store.read_file(&file_name, old)?;
        values.insert(file_name, value);
    }
    tracing::debug!(
        environment = store.environment(),
        secrets = values.len(),
        "decrypted all secrets under old key"
    );

    let new_keys = KeyPair::generate();

    for (file_name, value) in &values {
        store.write_file(file_name, value, new_keys.public())?;
    }

    Ok((new_keys, values.len()))
}
