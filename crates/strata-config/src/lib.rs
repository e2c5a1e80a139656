//! Layered configuration resolution
//!
//! This crate merges configuration from several sources into one nested,
//! case-insensitive key space:
//! - Command-line flags the user actually changed
//! - Environment variables (explicitly bound or derived from keys)
//! - Configuration files (YAML, TOML, JSON), deep-merged in load order
//! - Programmer-supplied defaults
//!
//! Keys are dot-delimited paths into nested maps (`database.host`) and are
//! matched case-insensitively without altering the stored spelling.
//!
//! # Example
//!
//! ```no_run
//! use strata_config::Resolver;
//!
//! let mut config = Resolver::new();
//! config.set_default("app.logging.level", "info");
//!
//! // Later files override earlier ones; failures are reported, not fatal
//! if let Err(e) = config.read_paths(["application.yaml", "environments/development.yaml"]) {
//!     eprintln!("{}", e);
//! }
//!
//! // APP_LOGGING_LEVEL=trace now wins over every file
//! config.automatic_env();
//!
//! let level = config.get_string("app.logging.level");
//! let workers = config.get_int("app.server.workers");
//! # Ok::<(), strata_config::ConfigError>(())
//! ```

pub mod error;
pub mod index;
pub mod loader;
pub mod resolver;
pub mod source;
pub mod value;

// Re-export main types for convenience
pub use error::{ConfigError, ErrorFormatter, LoadError, Result};
pub use index::MaterializedIndex;
pub use loader::merge::merge;
pub use loader::{read_bytes, ConfigFormat, ConfigSearch, SUPPORTED_EXTENSIONS};
pub use resolver::Resolver;
pub use source::{env_var_name, AttributeStore, EnvBindingStore, EnvLookup, FlagValue, OverrideStore, ProcessEnv};
pub use value::{ConfigTree, Value};
