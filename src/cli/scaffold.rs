//! Scaffolding for a brand-new vault directory.
//!
//! `untold init` creates the directory, drops a `.gitignore` that keeps
//! private keys out of version control plus a short README, and then
//! creates the first environment.

use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::errors::{Result, UntoldError};
use crate::vault::Vault;

const GITIGNORE: &str = "# Private keys never belong in version control.\n*.private\n";

const README: &str = "\
# Secrets vault

This directory is managed by `untold`.

- `<environment>.public`: public key; commit it.
- `<environment>.private`: private key; never commit it. Share it out of
  band or provide it through the `UNTOLD_KEY` environment variable.
- `<environment>/`: one encrypted file per secret. File names are hashes
  of the secret names, so the listing reveals nothing.

Add secrets with `untold add-secret <name>`, read them with
`untold show-secret <name>`, and replace an environment's keys with
`untold rotate-keys <environment>`.
";

/// Create the vault directory named by `settings.path_prefix` and the
/// environment named by `settings.environment` inside it.
///
/// Fails with `DirectoryAlreadyExists` if the directory is already there.
pub fn init_vault_dir(settings: Settings) -> Result<Vault> {
    let root = Path::new(&settings.path_prefix);
    if root.exists() {
        return Err(UntoldError::DirectoryAlreadyExists(root.to_path_buf()));
    }

    fs::create_dir_all(root)?;
    fs::write(root.join(".gitignore"), GITIGNORE)?;
    fs::write(root.join("README.md"), README)?;

    Vault::create_environment(settings)
}
