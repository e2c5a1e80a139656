//! Config file discovery across search paths

use crate::{error::ConfigError, loader::SUPPORTED_EXTENSIONS, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Finds `<dir>/<name>.<ext>` across an ordered list of directories
///
/// ```no_run
/// use strata_config::ConfigSearch;
///
/// let mut search = ConfigSearch::new("app");
/// search.add_path("/etc/app");
/// search.add_path("$HOME/.app");
/// let found = search.find()?;
/// # Ok::<(), strata_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSearch {
    name: String,
    paths: Vec<PathBuf>,
}

impl ConfigSearch {
    /// File name to look for, without extension
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Append a directory to search. `~`, `$HOME` and a leading `$VAR` are
    /// expanded and relative paths are made absolute. Duplicates are ignored.
    pub fn add_path(&mut self, dir: &str) -> &mut Self {
        if dir.is_empty() {
            return self;
        }
        let resolved = absolutize(&expand(dir));
        debug!(path = %resolved.display(), "adding config search path");
        if !self.paths.contains(&resolved) {
            self.paths.push(resolved);
        }
        self
    }

    /// First existing candidate. Directories are tried in insertion order,
    /// then the current directory; extensions in [`SUPPORTED_EXTENSIONS`] order.
    pub fn find(&self) -> Result<PathBuf> {
        let cwd = env::current_dir().ok();
        for dir in self.paths.iter().chain(cwd.as_ref()) {
            if let Some(found) = self.search_in(dir) {
                return Ok(found);
            }
        }

        Err(ConfigError::ConfigNotFound {
            name: self.name.clone(),
            searched: self
                .paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    fn search_in(&self, dir: &Path) -> Option<PathBuf> {
        SUPPORTED_EXTENSIONS.iter().find_map(|ext| {
            let candidate = dir.join(format!("{}.{}", self.name, ext));
            debug!(candidate = %candidate.display(), "checking for config file");
            candidate.is_file().then_some(candidate)
        })
    }
}

/// Expand `~`, `$HOME` and a leading `$VAR` segment
fn expand(input: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_default();

    if input == "~" {
        return home();
    }
    if let Some(rest) = input.strip_prefix("~/") {
        return home().join(rest);
    }
    if let Some(rest) = input.strip_prefix("$HOME") {
        return PathBuf::from(format!("{}{}", home().display(), rest));
    }
    if let Some(var) = input.strip_prefix('$') {
        let (name, rest) = match var.find(std::path::MAIN_SEPARATOR) {
            Some(end) => var.split_at(end),
            None => (var, ""),
        };
        let value = env::var(name).unwrap_or_default();
        return PathBuf::from(format!("{}{}", value, rest));
    }

    PathBuf::from(input)
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
