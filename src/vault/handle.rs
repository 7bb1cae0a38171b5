//! The `Vault` handle: one environment's keys plus its secret store.
//!
//! Keys are loaded lazily and at most once per handle.  `put` only ever
//! needs the public key, so adding secrets works on machines that do not
//! hold the private key.

use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crypto_box::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::binder::{self, Bindable};
use crate::config::{validate_env_name, Settings};
use crate::crypto::{decode_private_key, decode_public_key, KeyPair};
use crate::errors::{KeyKind, Result, UntoldError};

use super::rotation::{self, RotationReport};
use super::store::{write_atomic, SecretStore, GITKEEP};

/// Runtime handle bound to one environment.
pub struct Vault {
    settings: Settings,

    /// Explicit private key (e.g. from `--key`), highest precedence.
    private_key_override: Option<Zeroizing<String>>,

    store: SecretStore,

    /// Cached public key; filled on first use.
    public: OnceCell<PublicKey>,

    /// Cached full key pair; filled on first read.
    keys: OnceCell<KeyPair>,
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Bind a handle to the environment named in `settings`.
    ///
    /// Nothing is read from disk until a key is first needed.
    pub fn new(settings: Settings) -> Result<Self> {
        validate_env_name(&settings.environment)?;
        let store = SecretStore::new(settings.environment_dir(), settings.environment.clone());
        Ok(Self {
            settings,
            private_key_override: None,
            store,
            public: OnceCell::new(),
            keys: OnceCell::new(),
        })
    }

    /// Use this base64 private key instead of the environment variable
    /// or the `.private` file.  An empty value is ignored.
    pub fn with_private_key(mut self, encoded: impl Into<String>) -> Self {
        let encoded = Zeroizing::new(encoded.into());
        self.private_key_override = if encoded.trim().is_empty() {
            None
        } else {
            Some(encoded)
        };
        self
    }

    /// Create a brand-new environment and return a handle to it.
    ///
    /// Creates `<prefix>/<env>/` with a `.gitkeep` marker and writes a
    /// freshly generated key pair to `<env>.public` / `<env>.private`.
    /// Fails if the directory or either key file already exists.
    pub fn create_environment(settings: Settings) -> Result<Self> {
        validate_env_name(&settings.environment)?;

        let env_dir = settings.environment_dir();
        if env_dir.exists()
            || settings.public_key_path().exists()
            || settings.private_key_path().exists()
        {
            return Err(UntoldError::EnvironmentAlreadyExists(
                settings.environment.clone(),
            ));
        }

        fs::create_dir_all(&settings.path_prefix)?;
        fs::create_dir(&env_dir)?;
        fs::write(env_dir.join(GITKEEP), "*")?;

        let keys = KeyPair::generate();
        write_key_files(&settings, &keys)?;
        tracing::debug!(environment = %settings.environment, "environment created");

        Self::new(settings)
    }

    // ------------------------------------------------------------------
    // Secret operations
    // ------------------------------------------------------------------

    /// Decrypt and return the value of secret `name`.
    pub fn get(&self, name: &str) -> Result<String> {
        let keys = self.key_pair()?;
        self.store.read(name, keys)
    }

    /// Encrypt `value` and store it as secret `name`.
    ///
    /// Without `overwrite`, an existing secret is an error.
    pub fn put(&self, name: &str, value: &str, overwrite: bool) -> Result<()> {
        let public = self.public_key()?;
        self.store.write(name, value, public, overwrite)
    }

    /// Fail early unless secrets can be written here: the environment
    /// directory must exist and its public key must load.
    pub fn ensure_writable(&self) -> Result<()> {
        if !self.store.dir().is_dir() {
            return Err(UntoldError::EnvironmentNotFound(
                self.settings.environment.clone(),
            ));
        }
        self.public_key().map(|_| ())
    }

    /// Returns `true` if secret `name` exists (no decryption).
    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// Fill every tagged field of `target` with its secret value.
    ///
    /// Keys are loaded before the walk starts, so a missing key fails
    /// the whole call before any field is touched.
    pub fn load<B: Bindable + ?Sized>(&self, target: &mut B) -> Result<()> {
        self.key_pair()?;
        binder::bind(target, |name| self.get(name))
    }

    /// Replace this environment's key pair, re-encrypting every secret.
    ///
    /// The handle switches to the new keys afterwards.  See
    /// `rotation::rotate_environment` for the write ordering.
    pub fn rotate(&mut self) -> Result<RotationReport> {
        let (new_keys, secrets) = {
            let old = self.key_pair()?;
            rotation::rotate_environment(&self.store, old)?
        };

        write_key_files(&self.settings, &new_keys)?;
        tracing::info!(environment = %self.settings.environment, secrets, "keys rotated");

        self.public = OnceCell::from(new_keys.public().clone());
        self.keys = OnceCell::from(new_keys);

        Ok(RotationReport {
            environment: self.settings.environment.clone(),
            secrets,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn environment(&self) -> &str {
        &self.settings.environment
    }

    pub fn store(&self) -> &SecretStore {
        &self.store
    }

    /// Returns `true` once the full key pair has been loaded.
    pub fn keys_loaded(&self) -> bool {
        self.keys.get().is_some()
    }

    // ------------------------------------------------------------------
    // Key loading
    // ------------------------------------------------------------------

    /// The environment's public key, read from `<env>.public` once.
    pub fn public_key(&self) -> Result<&PublicKey> {
        if let Some(keys) = self.keys.get() {
            return Ok(keys.public());
        }
        if let Some(public) = self.public.get() {
            return Ok(public);
        }

        let text = read_key_file(
            &self.settings.public_key_path(),
            self.key_not_found(KeyKind::Public),
        )?;
        let public = decode_public_key(&text)?;
        tracing::debug!(environment = %self.settings.environment, "public key loaded");
        Ok(self.public.get_or_init(|| public))
    }

    /// The environment's full key pair, loaded once.
    pub fn key_pair(&self) -> Result<&KeyPair> {
        if let Some(keys) = self.keys.get() {
            return Ok(keys);
        }

        let public = self.public_key()?.clone();
        let private = self.load_private_key()?;
        Ok(self.keys.get_or_init(|| KeyPair::from_parts(public, private)))
    }

    /// Private key resolution: explicit override, then the configured
    /// environment variable (if set and non-empty), then `<env>.private`.
    fn load_private_key(&self) -> Result<SecretKey> {
        let environment = &self.settings.environment;

        if let Some(encoded) = &self.private_key_override {
            tracing::debug!(%environment, source = "override", "private key loaded");
            return decode_private_key(encoded);
        }

        if let Ok(encoded) = std::env::var(&self.settings.key_env_var) {
            let encoded = Zeroizing::new(encoded);
            if !encoded.trim().is_empty() {
                tracing::debug!(%environment, source = %self.settings.key_env_var, "private key loaded");
                return decode_private_key(&encoded);
            }
        }

        let encoded = read_key_file(
            &self.settings.private_key_path(),
            self.key_not_found(KeyKind::Private),
        )?;
        tracing::debug!(%environment, source = "file", "private key loaded");
        decode_private_key(&encoded)
    }

    fn key_not_found(&self, kind: KeyKind) -> UntoldError {
        UntoldError::KeyNotFound {
            environment: self.settings.environment.clone(),
            kind,
        }
    }
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("settings", &self.settings)
            .field("keys_loaded", &self.keys_loaded())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Key files
// ---------------------------------------------------------------------------

fn read_key_file(path: &Path, not_found: UntoldError) -> Result<Zeroizing<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Zeroizing::new(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found),
        Err(e) => Err(e.into()),
    }
}

/// Write both key files, public first.  The private key file is owner-only.
fn write_key_files(settings: &Settings, keys: &KeyPair) -> Result<()> {
    write_atomic(
        &settings.public_key_path(),
        keys.encode_public().as_bytes(),
        false,
    )?;
    write_atomic(
        &settings.private_key_path(),
        keys.encode_private().as_bytes(),
        true,
    )
}
