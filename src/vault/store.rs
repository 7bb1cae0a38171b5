//! File-backed secret storage for one environment.
//!
//! `SecretStore` owns the `<prefix>/<environment>/` directory.  Each secret
//! is a single file named by its `SecretAddress` and holding the base64
//! text of a sealed box.  Keys are passed in by the caller; the store never
//! reads key files itself.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crypto_box::PublicKey;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{codec, sealed, KeyPair};
use crate::errors::{Result, UntoldError};

use super::address::SecretAddress;

/// Housekeeping marker that keeps an empty environment directory in git.
pub const GITKEEP: &str = ".gitkeep";

pub struct SecretStore {
    /// Path to the environment directory.
    dir: PathBuf,

    /// Environment name, for error messages.
    environment: String,
}

impl SecretStore {
    pub fn new(dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            environment: environment.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Full path of the file that holds `name`.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(SecretAddress::of(name).file_name())
    }

    /// Returns `true` if a secret file exists for `name`.
    ///
    /// This is a metadata-only check — no decryption is performed.
    pub fn contains(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    // ------------------------------------------------------------------
    // Named access
    // ------------------------------------------------------------------

    /// Decrypt the secret stored for `name`.
    pub fn read(&self, name: &str, keys: &KeyPair) -> Result<String> {
        let path = self.path_of(name);
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => UntoldError::SecretNotFound {
                name: name.to_string(),
                environment: self.environment.clone(),
            },
            _ => UntoldError::Io(e),
        })?;

        open_text(&text, keys)
    }

    /// Seal `plaintext` under `public` and store it for `name`.
    ///
    /// Without `overwrite`, an existing secret is left untouched and
    /// `SecretAlreadyExists` is returned.  With it, the file is replaced.
    pub fn write(
        &self,
        name: &str,
        plaintext: &str,
        public: &PublicKey,
        overwrite: bool,
    ) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(UntoldError::EnvironmentNotFound(self.environment.clone()));
        }

        let address = SecretAddress::of(name);
        let path = self.dir.join(address.file_name());
        if !overwrite && path.exists() {
            return Err(UntoldError::SecretAlreadyExists {
                name: name.to_string(),
                environment: self.environment.clone(),
            });
        }

        seal_to(&path, plaintext, public)?;
        tracing::debug!(environment = %self.environment, %address, overwrite, "secret written");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Raw file access (rotation works on file names, not secret names)
    // ------------------------------------------------------------------

    /// List every secret file name in the environment directory, sorted.
    ///
    /// Dotfiles (`.gitkeep`, in-flight temp files) and anything that is
    /// not a regular file are skipped.
    pub fn list_files(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| match e.kind() {
            ErrorKind::NotFound => UntoldError::EnvironmentNotFound(self.environment.clone()),
            _ => UntoldError::Io(e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == GITKEEP || name.starts_with('.') {
                continue;
            }
            files.push(name);
        }

        files.sort();
        Ok(files)
    }

    /// Decrypt the secret file called `file_name`.
    pub fn read_file(&self, file_name: &str, keys: &KeyPair) -> Result<Zeroizing<String>> {
        let text = fs::read_to_string(self.dir.join(file_name))?;
        open_text(&text, keys).map(Zeroizing::new)
    }

    /// Seal `plaintext` under `public` and replace the file `file_name`.
    pub fn write_file(&self, file_name: &str, plaintext: &str, public: &PublicKey) -> Result<()> {
        seal_to(&self.dir.join(file_name), plaintext, public)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seal_to(path: &Path, plaintext: &str, public: &PublicKey) -> Result<()> {
    let ciphertext = sealed::seal(plaintext.as_bytes(), public)?;
    write_atomic(path, codec::encode(&ciphertext).as_bytes(), false)
}

fn open_text(text: &str, keys: &KeyPair) -> Result<String> {
    let ciphertext = codec::decode(text)?;
    let plaintext = sealed::open(&ciphertext, keys.public(), keys.private())?;

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        UntoldError::InvalidUtf8
    })
}

/// Write a file **atomically**: temp file in the same directory, then
/// rename over the target.  Readers never see a half-written file.
///
/// With `owner_only`, the temp file is created with mode 0600 on Unix, so
/// the contents are never readable by anyone else.
pub(crate) fn write_atomic(path: &Path, contents: &[u8], owner_only: bool) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let written = create_temp(&tmp_path, owner_only).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Create a fresh temp file.  A leftover from an interrupted write is
/// removed first so its permissions are not inherited.
fn create_temp(tmp_path: &Path, owner_only: bool) -> io::Result<File> {
    match fs::remove_file(tmp_path) {
        Err(e) if e.kind() != ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if owner_only {
            options.mode(0o600);
        }
    }
    #[cfg(not(unix))]
    let _ = owner_only;

    options.open(tmp_path)
}
