use clap::Parser;
use passvault::cli::{Cli, Commands};

/// Environment variable holding the log filter (e.g. `passvault=debug`).
const LOG_ENV: &str = "PASSVAULT_LOG";

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add {
            ref website,
            ref nickname,
            generate,
            length,
        } => passvault::cli::commands::add::execute(
            &cli,
            website,
            nickname.as_deref(),
            generate,
            length,
        ),
        Commands::List { show } => passvault::cli::commands::list::execute(&cli, show),
        Commands::Delete { index, force } => {
            passvault::cli::commands::delete::execute(&cli, index, force)
        }
        Commands::Wipe { force } => passvault::cli::commands::wipe::execute(&cli, force),
        Commands::Copy { index } => passvault::cli::commands::copy::execute(&cli, index),
        Commands::Generate { length } => {
            passvault::cli::commands::generate::execute(&cli, length)
        }
        Commands::Strength => passvault::cli::commands::strength::execute(&cli),
        Commands::Serve => passvault::cli::commands::serve::execute(&cli),
        Commands::Audit { last, ref since } => {
            passvault::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => passvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never mix with command output or the
/// `serve` protocol on stdout.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("passvault=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
