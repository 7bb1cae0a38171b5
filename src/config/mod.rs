//! Project configuration (`.untold.toml`).

pub mod settings;

pub use settings::{validate_env_name, Settings};
