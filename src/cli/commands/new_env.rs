//! `untold new-env` — create an environment with a fresh key pair.

use crate::cli::output;
use crate::cli::{settings, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `new-env` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let settings = settings(cli, Some(name))?;
    let vault = Vault::create_environment(settings)?;

    output::success(&format!("Created '{}' environment", vault.environment()));
    output::hint(&format!(
        "Private key written to {}",
        vault.settings().private_key_path().display()
    ));
    Ok(())
}
