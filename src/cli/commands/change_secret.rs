//! `untold change-secret` — replace an existing secret's value.

use crate::cli::output;
use crate::cli::{open_vault, read_value, settings, Cli};
use crate::errors::{Result, UntoldError};

/// Execute the `change-secret` command.
pub fn execute(cli: &Cli, name: &str, value: Option<&str>) -> Result<()> {
    let vault = open_vault(settings(cli, None)?, cli)?;
    vault.ensure_writable()?;

    if !vault.contains(name) {
        return Err(UntoldError::SecretNotFound {
            name: name.to_string(),
            environment: vault.environment().to_string(),
        });
    }

    let secret = read_value(name, vault.environment(), value)?;
    vault.put(name, &secret, true)?;

    output::success(&format!(
        "Secret '{}' changed in '{}' environment",
        name,
        vault.environment()
    ));
    Ok(())
}
