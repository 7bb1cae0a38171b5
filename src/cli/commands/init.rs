//! `untold init` — create the vault directory and its first environment.

use crate::cli::output;
use crate::cli::{scaffold, settings, Cli};
use crate::errors::Result;

/// Execute the `init` command.
pub fn execute(cli: &Cli, directory: Option<&str>) -> Result<()> {
    let mut settings = settings(cli, None)?;
    if let Some(dir) = directory {
        settings = settings.with_path_prefix(dir);
    }

    let vault = scaffold::init_vault_dir(settings)?;
    let prefix = &vault.settings().path_prefix;

    output::success(&format!(
        "Initialized vault in '{}' with '{}' environment",
        prefix,
        vault.environment()
    ));
    output::hint(&format!(
        "Keep {} out of version control.",
        vault.settings().private_key_path().display()
    ));
    Ok(())
}
