use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use untold::cli::commands;
use untold::cli::{output, Cli, Commands};

fn init_logging(verbose: bool) {
    let default = if verbose { "untold=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { ref directory } => commands::init::execute(&cli, directory.as_deref()),
        Commands::NewEnv { ref name } => commands::new_env::execute(&cli, name),
        Commands::AddSecret {
            ref name,
            ref value,
        } => commands::add_secret::execute(&cli, name, value.as_deref()),
        Commands::ShowSecret { ref name } => commands::show_secret::execute(&cli, name),
        Commands::ChangeSecret {
            ref name,
            ref value,
        } => commands::change_secret::execute(&cli, name, value.as_deref()),
        Commands::RotateKeys { ref environment } => {
            commands::rotate::execute(&cli, environment.as_deref())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        output::failure(&e);
        std::process::exit(e.exit_code());
    }
}
