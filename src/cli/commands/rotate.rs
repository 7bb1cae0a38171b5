//! `untold rotate-keys` — replace an environment's key pair.
//!
//! Every secret is decrypted with the old key, re-encrypted with a new
//! one, and only then are the key files overwritten.

use crate::cli::output;
use crate::cli::{open_vault, settings, Cli};
use crate::errors::Result;

/// Execute the `rotate-keys` command.
pub fn execute(cli: &Cli, environment: Option<&str>) -> Result<()> {
    let mut vault = open_vault(settings(cli, environment)?, cli)?;
    let report = vault.rotate()?;

    output::success(&format!(
        "Rotated keys for '{}' environment ({} secrets re-encrypted)",
        report.environment, report.secrets
    ));
    output::hint(&format!(
        "Distribute the new {} to everyone who needs it.",
        vault.settings().private_key_path().display()
    ));
    Ok(())
}
