//! Precedence chain over flags, environment and attributes
//!
//! Each item takes precedence over the item below it:
//!
//! 1. flag overrides (only flags the user changed)
//! 2. environment bindings
//! 3. attributes: files, explicit [`Resolver::set`] calls and defaults
//!
//! Within the attribute tier precedence is call order. A `set` issued before
//! `read_paths` can be overwritten by the file; issue it afterwards to win.

use crate::error::{LoadError, Result};
use crate::loader::{load_from_file, ConfigFormat, ConfigSearch};
use crate::source::{
    flag_default, AttributeStore, EnvBindingStore, EnvLookup, FlagValue, OverrideStore, ProcessEnv,
};
use crate::value::{ConfigTree, Value};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resolves keys across every configured source
///
/// ```
/// use strata_config::Resolver;
///
/// let mut config = Resolver::new();
/// config.set_default("database.port", 5432);
/// config.set("Database.Host", "localhost");
///
/// assert_eq!(config.get_string("database.host"), "localhost");
/// assert_eq!(config.get_int("DATABASE.PORT"), 5432);
/// ```
#[derive(Clone)]
pub struct Resolver {
    attributes: AttributeStore,
    env: EnvBindingStore,
    flags: OverrideStore,
    env_lookup: Arc<dyn EnvLookup>,
    root_path: Option<PathBuf>,
    config_type: Option<ConfigFormat>,
}

impl Resolver {
    /// A resolver reading the process environment
    pub fn new() -> Self {
        Self::with_env_lookup(Arc::new(ProcessEnv))
    }

    /// A resolver reading environment variables from `env` instead of the process
    pub fn with_env(env: impl EnvLookup + 'static) -> Self {
        Self::with_env_lookup(Arc::new(env))
    }

    fn with_env_lookup(env_lookup: Arc<dyn EnvLookup>) -> Self {
        Self {
            attributes: AttributeStore::new(),
            env: EnvBindingStore::new(),
            flags: OverrideStore::new(),
            env_lookup,
            root_path: None,
            config_type: None,
        }
    }

    /// Back to a freshly constructed state. The environment source is kept.
    pub fn reset(&mut self) {
        *self = Self::with_env_lookup(Arc::clone(&self.env_lookup));
    }

    /// First source in the chain that has `key`
    pub fn find(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.flags.get(key) {
            trace!(key, %value, "found in override (via flag)");
            return Some(value);
        }

        if let Some(value) = self.env.get(key, self.env_lookup.as_ref()) {
            trace!(key, %value, "found in environment");
            return Some(value);
        }

        if let Some(value) = self.attributes.get(key) {
            trace!(key, %value, "found in config");
            return Some(value.clone());
        }

        None
    }

    /// Resolve `key` case-insensitively. A null value counts as absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        let key = key.to_lowercase();
        trace!(key = %key, "looking up key");
        self.find(&key).filter(|value| !value.is_null())
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Present in the attribute tier, ignoring flags and environment
    pub fn in_config(&self, key: &str) -> bool {
        self.attributes.contains(key)
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(|v| v.cast_string()).unwrap_or_default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(|v| v.cast_bool()).unwrap_or_default()
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).map(|v| v.cast_int()).unwrap_or_default()
    }

    pub fn get_float64(&self, key: &str) -> f64 {
        self.get(key).map(|v| v.cast_float()).unwrap_or_default()
    }

    /// The Unix epoch when absent or not a time
    pub fn get_time(&self, key: &str) -> DateTime<Utc> {
        self.get(key)
            .and_then(|v| v.cast_time())
            .unwrap_or_default()
    }

    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| v.cast_string_slice())
            .unwrap_or_default()
    }

    pub fn get_string_map(&self, key: &str) -> ConfigTree {
        self.get(key)
            .map(|v| v.cast_string_map())
            .unwrap_or_default()
    }

    pub fn get_string_map_string(&self, key: &str) -> BTreeMap<String, String> {
        self.get(key)
            .map(|v| v.cast_string_map_string())
            .unwrap_or_default()
    }

    /// Write `value` only if no source currently answers for `key`
    ///
    /// Presence is checked across the whole chain, so a bound environment
    /// variable or changed flag also blocks the default, as does an earlier default.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        if !self.is_set(key) {
            self.attributes.set(key, value.into());
        }
    }

    /// Unconditional write into the attribute tier
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.set(key, value.into());
    }

    /// Bind `key` to a command-line flag
    ///
    /// The flag answers from the override tier once the user changes it.
    /// Until then its declared default is offered through [`Resolver::set_default`].
    pub fn bind_flag(&mut self, key: &str, flag: Arc<dyn FlagValue>) {
        let default = flag_default(flag.as_ref());
        debug!(key, type_tag = flag.type_tag(), "bound key to flag");
        self.flags.bind(key, flag);
        self.set_default(key, default);
    }

    /// Bind `key` to an environment variable, `None` deriving the name from the key
    pub fn bind_env(&mut self, key: &str, env_var: Option<&str>) -> Result<()> {
        self.env.bind(key, env_var)
    }

    /// Bind every known key to its derived environment variable name
    pub fn automatic_env(&mut self) {
        for key in self.all_keys() {
            if let Err(e) = self.env.bind(&key, None) {
                warn!(key = %key, error = %e, "skipping automatic env binding");
            }
        }
    }

    /// Relative paths given to [`Resolver::read_paths`] resolve under `root`
    pub fn set_root_path(&mut self, root: impl Into<PathBuf>) {
        self.root_path = Some(root.into());
    }

    /// Decode every file as `format` instead of detecting it from the extension
    pub fn set_config_type(&mut self, format: &str) -> Result<()> {
        self.config_type = Some(format.parse()?);
        Ok(())
    }

    /// Load each path in order, deep-merging it over what is already loaded
    ///
    /// A path that fails to read or parse is recorded and skipped; later paths
    /// still load. Every failure comes back together in one
    /// [`ConfigError::Load`](crate::ConfigError::Load).
    pub fn read_paths<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut errors = LoadError::new();

        for path in paths {
            let path = self.resolve_path(path.as_ref());
            match load_from_file(&path, self.config_type) {
                Ok(tree) => self.attributes.merge_overlay(tree),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config path");
                    errors.push(path, e);
                }
            }
        }

        errors.into_result()
    }

    /// Find a config file through `search` and load it
    pub fn read_in_config(&mut self, search: &ConfigSearch) -> Result<PathBuf> {
        let path = search.find()?;
        debug!(path = %path.display(), "reading discovered config file");
        self.read_paths([&path])?;
        Ok(path)
    }

    /// Deep-merge already-decoded data over the attribute tier
    pub fn merge_attributes(&mut self, tree: ConfigTree) {
        self.attributes.merge_overlay(tree);
    }

    /// Every key known to the attribute tier, lowercased and sorted
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .attributes
            .all_keys()
            .into_iter()
            .map(|k| k.to_lowercase())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Snapshot of every known key resolved through the full chain
    pub fn all_settings(&self) -> ConfigTree {
        self.all_keys()
            .into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn env_bindings(&self) -> &BTreeMap<String, String> {
        self.env.bindings()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.root_path {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("attributes", self.attributes.to_string_map())
            .field("env", self.env.bindings())
            .field("flags", &self.flags)
            .field("root_path", &self.root_path)
            .field("config_type", &self.config_type)
            .finish()
    }
}
