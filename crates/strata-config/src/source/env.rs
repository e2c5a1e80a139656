//! Environment variable tier
//!
//! Keys are bound explicitly or derived from the key itself:
//!
//! - `app.logging.level` → `APP_LOGGING_LEVEL`
//! - `port` → `PORT`
//!
//! An empty variable counts as unset; the environment cannot carry an empty
//! string as a distinguishable value here.

use crate::{error::ConfigError, value::Value, Result};
use std::collections::{BTreeMap, HashMap};
use std::env;
use tracing::{debug, trace};

/// Read access to a set of environment variables
pub trait EnvLookup: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Default variable name for a key: uppercased, dots replaced by underscores
pub fn env_var_name(key: &str) -> String {
    key.to_uppercase().replace('.', "_")
}

/// Bound keys and the variables that answer for them
#[derive(Debug, Clone, Default)]
pub struct EnvBindingStore {
    bindings: BTreeMap<String, String>,
}

impl EnvBindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `env_var`, or to [`env_var_name`] of the key when `None`
    pub fn bind(&mut self, key: &str, env_var: Option<&str>) -> Result<()> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        let env_var = match env_var {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => env_var_name(key),
        };
        debug!(key, env_var = %env_var, "bound key to environment variable");
        self.bindings.insert(key.to_lowercase(), env_var);
        Ok(())
    }

    /// Read the variable bound to `key`; unbound or empty is a miss
    pub fn get(&self, key: &str, env: &dyn EnvLookup) -> Option<Value> {
        let env_var = self.bindings.get(&key.to_lowercase())?;
        trace!(key, env_var = %env_var, "key registered as env var");

        match env.lookup(env_var) {
            Some(value) if !value.is_empty() => Some(Value::String(value)),
            _ => {
                trace!(env_var = %env_var, "env value unset");
                None
            }
        }
    }

    pub fn bindings(&self) -> &BTreeMap<String, String> {
        &self.bindings
    }

    pub fn is_bound(&self, key: &str) -> bool {
        self.bindings.contains_key(&key.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Global lock to serialize process env tests
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_name() {
        assert_eq!(env_var_name("app.logging.level"), "APP_LOGGING_LEVEL");
        assert_eq!(env_var_name("Port"), "PORT");
    }

    #[test]
    fn test_bound_key_reads_env() {
        let mut store = EnvBindingStore::new();
        store.bind("id", None).unwrap();
        store.bind("f", Some("FOOD")).unwrap();

        let env = env_of(&[("ID", "13"), ("FOOD", "apple")]);
        assert_eq!(store.get("id", &env), Some(Value::from("13")));
        assert_eq!(store.get("F", &env), Some(Value::from("apple")));
    }

    #[test]
    fn test_unbound_key_misses() {
        let store = EnvBindingStore::new();
        let env = env_of(&[("NAME", "crunk")]);
        assert_eq!(store.get("name", &env), None);
    }

    #[test]
    fn test_empty_value_is_unset() {
        let mut store = EnvBindingStore::new();
        store.bind("name", None).unwrap();
        let env = env_of(&[("NAME", "")]);
        assert_eq!(store.get("name", &env), None);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut store = EnvBindingStore::new();
        assert!(matches!(store.bind("", None), Err(ConfigError::EmptyKey)));
    }

    #[test]
    fn test_mixed_case_key_binds_lowercase() {
        let mut store = EnvBindingStore::new();
        store.bind("Database.Host", None).unwrap();
        assert!(store.is_bound("database.host"));
        assert_eq!(store.bindings()["database.host"], "DATABASE_HOST");
    }

    #[test]
    fn test_process_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        env::set_var("STRATA_TEST_PROCESS_ENV", "present");

        let mut store = EnvBindingStore::new();
        store.bind("strata.test.process.env", None).unwrap();
        assert_eq!(
            store.get("strata.test.process.env", &ProcessEnv),
            Some(Value::from("present"))
        );

        env::remove_var("STRATA_TEST_PROCESS_ENV");
        assert_eq!(store.get("strata.test.process.env", &ProcessEnv), None);
    }
}
