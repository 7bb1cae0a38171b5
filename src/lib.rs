pub mod binder;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod vault;

pub use binder::{bind, Bindable, Field};
pub use config::Settings;
pub use crypto::KeyPair;
pub use errors::{Result, UntoldError};
pub use vault::Vault;
