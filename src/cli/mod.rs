//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;
pub mod scaffold;

use std::io::{self, IsTerminal, Read};

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, UntoldError};
use crate::vault::Vault;

/// untold CLI: per-environment encrypted secrets stored as plain files.
#[derive(Parser)]
#[command(
    name = "untold",
    about = "File-based secret vault with per-environment keys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Environment to use (default: development, or .untold.toml)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Vault directory (default: untold, or .untold.toml)
    #[arg(long, global = true)]
    pub dir: Option<String>,

    /// Private key (base64), overriding the key variable and .private file
    #[arg(short, long, global = true)]
    pub key: Option<String>,

    /// Log what the vault engine is doing to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a vault directory with its first environment
    Init {
        /// Directory to create (default: untold)
        directory: Option<String>,
    },

    /// Create a new environment with a fresh key pair
    NewEnv {
        /// Environment name (e.g. production)
        name: String,
    },

    /// Add a new secret
    AddSecret {
        /// Secret name (e.g. db_password)
        name: String,
        /// Secret value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Show a secret's decrypted value
    ShowSecret {
        /// Secret name
        name: String,
    },

    /// Change an existing secret's value
    ChangeSecret {
        /// Secret name
        name: String,
        /// New value (omit for interactive prompt)
        value: Option<String>,
    },

    /// Generate new keys for an environment and re-encrypt its secrets
    RotateKeys {
        /// Environment to rotate (default: --env)
        environment: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve settings: `.untold.toml` in the working directory, then flags.
///
/// `environment` is a command's positional environment argument; it wins
/// over `--env`.
pub fn settings(cli: &Cli, environment: Option<&str>) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;

    if let Some(dir) = &cli.dir {
        settings = settings.with_path_prefix(dir.as_str());
    }

    match environment.or(cli.env.as_deref()) {
        Some(env) => settings = settings.with_environment(env),
        None => output::using_default_environment(&settings.environment),
    }

    Ok(settings)
}

/// Open a vault handle for the selected environment, honouring `--key`.
pub fn open_vault(settings: Settings, cli: &Cli) -> Result<Vault> {
    let vault = Vault::new(settings)?;
    Ok(match &cli.key {
        Some(key) => vault.with_private_key(key.as_str()),
        None => vault,
    })
}

/// Determine a secret value from one of three sources: the command line,
/// piped stdin, or a hidden interactive prompt.
///
/// Returns `Zeroizing<String>` so the value is wiped from memory on drop.
pub fn read_value(
    name: &str,
    environment: &str,
    value: Option<&str>,
) -> Result<Zeroizing<String>> {
    if let Some(v) = value {
        output::warning("Value provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(|c: char| c == '\r' || c == '\n');
        return Ok(Zeroizing::new(trimmed.to_string()));
    }

    let input = dialoguer::Password::new()
        .with_prompt(format!("Enter value for '{name}' secret in '{environment}' environment"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| UntoldError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(input))
}
