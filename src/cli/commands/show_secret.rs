//! `untold show-secret` — print a secret's decrypted value.

use zeroize::Zeroizing;

use crate::cli::{open_vault, settings, Cli};
use crate::errors::Result;

/// Execute the `show-secret` command.
///
/// Only the raw value goes to stdout so it can be piped.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let vault = open_vault(settings(cli, None)?, cli)?;
    let value = Zeroizing::new(vault.get(name)?);
    println!("{}", value.as_str());
    Ok(())
}
