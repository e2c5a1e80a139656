mod commands;
mod flags;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches};
use commands::{handle_dump, handle_get, handle_keys, handle_settings, Cli, Commands};

fn main() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let log_level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::build_resolver(&cli, &matches)?;

    match &cli.command {
        Commands::Get { key } => handle_get(&config, key)?,
        Commands::Keys => handle_keys(&config),
        Commands::Settings { format } => handle_settings(&config, *format)?,
        Commands::Dump => handle_dump(&config),
    }

    Ok(())
}
