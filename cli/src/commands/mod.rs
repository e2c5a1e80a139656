pub mod dump;
pub mod get;
pub mod keys;
pub mod settings;

pub use dump::handle_dump;
pub use get::handle_get;
pub use keys::handle_keys;
pub use settings::{handle_settings, SettingsFormat};

use crate::flags::ClapFlag;
use anyhow::Result;
use clap::{ArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use strata_config::{ConfigError, ConfigSearch, ErrorFormatter, Resolver};
use tracing::debug;

/// Base name looked up when no `--config` is given
const DEFAULT_CONFIG_NAME: &str = "strata";

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Resolve layered configuration from files, environment and flags")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to load; repeat to layer files, later ones win
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Vec<PathBuf>,

    /// Directory that relative config paths resolve under
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Decode every file as this format instead of using its extension
    #[arg(long, value_name = "TYPE", global = true)]
    pub config_type: Option<String>,

    /// Bind every known key to its derived environment variable
    #[arg(long, global = true)]
    pub automatic_env: bool,

    /// Set KEY=VALUE after files are loaded
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val, global = true)]
    pub sets: Vec<(String, String)>,

    /// Default KEY=VALUE applied before files are loaded
    #[arg(long = "default", value_name = "KEY=VALUE", value_parser = parse_key_val, global = true)]
    pub defaults: Vec<(String, String)>,

    /// Log filter when RUST_LOG is unset; also resolvable as `log.level`
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved value of a key
    Get {
        /// Dot-delimited key, matched case-insensitively
        key: String,
    },
    /// List every known key
    Keys,
    /// Print every known key resolved through all sources
    Settings {
        /// Output format
        #[arg(long, value_enum, default_value_t = SettingsFormat::Json)]
        format: SettingsFormat,
    },
    /// Print the raw state of each source
    Dump,
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build a resolver from the parsed command line
///
/// Load failures are reported on stderr and do not stop the command.
pub fn build_resolver(cli: &Cli, matches: &ArgMatches) -> Result<Resolver> {
    let mut config = Resolver::new();

    if let Some(root) = &cli.root {
        config.set_root_path(root);
    }
    if let Some(format) = &cli.config_type {
        config.set_config_type(format)?;
    }

    for (key, value) in &cli.defaults {
        config.set_default(key, value.as_str());
    }
    if let Some(flag) = ClapFlag::from_matches(matches, "log_level") {
        config.bind_flag("log.level", flag);
    }

    if cli.config.is_empty() {
        let mut search = ConfigSearch::new(DEFAULT_CONFIG_NAME);
        if let Some(root) = &cli.root {
            search.add_path(&root.to_string_lossy());
        }
        match config.read_in_config(&search) {
            Ok(path) => debug!(path = %path.display(), "loaded discovered config"),
            Err(ConfigError::ConfigNotFound { .. }) => debug!("no config file discovered"),
            Err(e) => report(&e),
        }
    } else if let Err(e) = config.read_paths(&cli.config) {
        report(&e);
    }

    if cli.automatic_env {
        config.automatic_env();
    }
    for (key, value) in &cli.sets {
        config.set(key, value.as_str());
    }

    Ok(config)
}

fn report(error: &ConfigError) {
    eprintln!("{}", ErrorFormatter::new(error));
}
