//! Vault module — per-environment encrypted secret storage.
//!
//! This module provides:
//! - Secret name to file name mapping (`address`)
//! - File-backed secret reads and writes (`store`)
//! - The `Vault` handle with lazy key loading (`handle`)
//! - Key rotation (`rotation`)

pub mod address;
pub mod handle;
pub mod rotation;
pub mod store;

// Re-export the most commonly used items.
pub use address::SecretAddress;
pub use handle::Vault;
pub use rotation::RotationReport;
pub use store::SecretStore;
