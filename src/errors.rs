use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which half of an environment's key pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Public => f.write_str("public"),
            KeyKind::Private => f.write_str("private"),
        }
    }
}

/// All errors that can occur in untold.
#[derive(Debug, Error)]
pub enum UntoldError {
    // --- Not found ---
    #[error("Directory for '{0}' environment not found")]
    EnvironmentNotFound(String),

    #[error("{kind} key for '{environment}' environment not found")]
    KeyNotFound { environment: String, kind: KeyKind },

    #[error("Secret '{name}' for '{environment}' environment not found")]
    SecretNotFound { name: String, environment: String },

    // --- Already exists ---
    #[error("Environment '{0}' already exists")]
    EnvironmentAlreadyExists(String),

    #[error("Secret '{name}' for '{environment}' environment already exists (use `change-secret` to update)")]
    SecretAlreadyExists { name: String, environment: String },

    #[error("Directory {0} already exists")]
    DirectoryAlreadyExists(PathBuf),

    // --- Keys and ciphertext ---
    #[error("Corrupted key — expected {expected} bytes, got {actual}")]
    CorruptedKey { expected: usize, actual: usize },

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong key or tampered ciphertext")]
    DecryptionFailed,

    #[error("Secret value is not valid UTF-8")]
    InvalidUtf8,

    // --- Binder ---
    #[error("Binding tag '{tag}' used on a field of type {type_name}; only String fields can hold secrets")]
    UnsupportedFieldType {
        tag: String,
        type_name: &'static str,
    },

    #[error("Structure nests deeper than {0} levels — is it self-referencing?")]
    CyclicStructure(usize),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

}

impl UntoldError {
    /// Returns `true` for the "missing file or directory" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            UntoldError::EnvironmentNotFound(_)
                | UntoldError::KeyNotFound { .. }
                | UntoldError::SecretNotFound { .. }
        )
    }

    /// Returns `true` when creation was refused because the target exists.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            UntoldError::EnvironmentAlreadyExists(_)
                | UntoldError::SecretAlreadyExists { .. }
                | UntoldError::DirectoryAlreadyExists(_)
        )
    }

    /// Process exit code for the command-line front end.
    ///
    /// Missing or already-present targets are usage errors (2); everything
    /// else is a plain failure (1).
    pub fn exit_code(&self) -> i32 {
        if self.is_not_found() || self.is_already_exists() {
            2
        } else {
            1
        }
    }
}

/// Convenience type alias for untold results.
pub type Result<T> = std::result::Result<T, UntoldError>;
