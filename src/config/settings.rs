use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, UntoldError};

/// Vault configuration, loaded from `.untold.toml`.
///
/// Every field has a sensible default so untold works out-of-the-box
/// without any config file at all.  A `Settings` value is immutable once
/// handed to a `Vault`; use the `with_*` functions to derive variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding key files and per-environment secret directories.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Environment to use when none is specified.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Environment variable consulted for the private key before the
    /// `<environment>.private` file.
    #[serde(default = "default_key_env_var")]
    pub key_env_var: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_path_prefix() -> String {
    "untold".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_key_env_var() -> String {
    "UNTOLD_KEY".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            path_prefix: default_path_prefix(),
            environment: default_environment(),
            key_env_var: default_key_env_var(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".untold.toml";

    /// Load settings from `<project_dir>/.untold.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            UntoldError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_key_env_var(mut self, name: impl Into<String>) -> Self {
        self.key_env_var = name.into();
        self
    }

    /// `<prefix>/<environment>/`, where the secret files live.
    pub fn environment_dir(&self) -> PathBuf {
        Path::new(&self.path_prefix).join(&self.environment)
    }

    /// `<prefix>/<environment>.public`
    pub fn public_key_path(&self) -> PathBuf {
        Path::new(&self.path_prefix).join(format!("{}.public", self.environment))
    }

    /// `<prefix>/<environment>.private`
    pub fn private_key_path(&self) -> PathBuf {
        Path::new(&self.path_prefix).join(format!("{}.private", self.environment))
    }
}

/// Validate that an environment name is safe to join into a path.
///
/// Allowed: ASCII letters, digits, hyphens, underscores.  Must not be
/// empty, start with a hyphen, or exceed 64 characters.
pub fn validate_env_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(UntoldError::ConfigError(
            "environment name cannot be empty".into(),
        ));
    }

    if name.len() > 64 {
        return Err(UntoldError::ConfigError(
            "environment name cannot exceed 64 characters".into(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(UntoldError::ConfigError(format!(
            "environment name '{name}' is invalid — only letters, digits, hyphens, and underscores are allowed"
        )));
    }

    if name.starts_with('-') {
        return Err(UntoldError::ConfigError(format!(
            "environment name '{name}' cannot start with a hyphen"
        )));
    }

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────
