//! Bridges parsed clap arguments to the resolver's override tier

use clap::parser::ValueSource;
use clap::ArgMatches;
use std::sync::Arc;
use strata_config::FlagValue;

/// A snapshot of one clap argument after parsing
#[derive(Debug, Clone)]
pub struct ClapFlag {
    value: String,
    type_tag: &'static str,
    changed: bool,
}

impl ClapFlag {
    pub fn new(value: impl Into<String>, type_tag: &'static str, changed: bool) -> Self {
        Self {
            value: value.into(),
            type_tag,
            changed,
        }
    }

    /// Capture the string argument `id`; it counts as changed only when typed on the command line
    pub fn from_matches(matches: &ArgMatches, id: &str) -> Option<Arc<Self>> {
        let value = matches.get_one::<String>(id)?;
        let changed = matches.value_source(id) == Some(ValueSource::CommandLine);
        Some(Arc::new(Self::new(value.as_str(), "string", changed)))
    }
}

impl FlagValue for ClapFlag {
    fn value_string(&self) -> String {
        self.value.clone()
    }

    fn type_tag(&self) -> &str {
        self.type_tag
    }

    fn changed(&self) -> bool {
        self.changed
    }
}
