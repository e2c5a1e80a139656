//! File-based configuration loading

use crate::{error::ConfigError, loader::ConfigFormat, ConfigTree, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a configuration file into a tree
///
/// `format` overrides extension-based detection when given.
pub fn load_from_file<P: AsRef<Path>>(path: P, format: Option<ConfigFormat>) -> Result<ConfigTree> {
    let path = path.as_ref();

    // Unsupported formats are reported before touching the filesystem
    let format = match format {
        Some(format) => format,
        None => ConfigFormat::from_path(path)?,
    };

    let content = fs::read_to_string(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "error reading config file");
        ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let tree = format.parse(&content, path.to_str())?;
    debug!(path = %path.display(), %format, keys = tree.len(), "loaded config file");
    Ok(tree)
}
