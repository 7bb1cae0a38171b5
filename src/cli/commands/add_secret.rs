//! `untold add-secret` — store a new secret.

use crate::cli::output;
use crate::cli::{open_vault, read_value, settings, Cli};
use crate::errors::{Result, UntoldError};

/// Execute the `add-secret` command.
///
/// Refuses to touch an existing secret; use `change-secret` for that.
pub fn execute(cli: &Cli, name: &str, value: Option<&str>) -> Result<()> {
    let vault = open_vault(settings(cli, None)?, cli)?;
    vault.ensure_writable()?;

    if vault.contains(name) {
        return Err(UntoldError::SecretAlreadyExists {
            name: name.to_string(),
            environment: vault.environment().to_string(),
        });
    }

    let secret = read_value(name, vault.environment(), value)?;
    vault.put(name, &secret, false)?;

    output::success(&format!(
        "Secret '{}' added to '{}' environment",
        name,
        vault.environment()
    ));
    Ok(())
}
