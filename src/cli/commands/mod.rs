//! One module per subcommand.

pub mod add_secret;
pub mod change_secret;
pub mod init;
pub mod new_env;
pub mod rotate;
pub mod show_secret;
