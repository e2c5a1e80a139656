//! Configuration loading from files and in-memory documents

pub mod file;
pub mod formats;
pub mod merge;
pub mod search;

use crate::{error::ConfigError, ConfigTree, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use file::load_from_file;
pub use search::ConfigSearch;

/// File extensions recognized by extension-based format detection
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json", "toml", "yaml", "yml"];

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

impl ConfigFormat {
    /// Detect configuration format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
        ext.parse::<ConfigFormat>()
            .map_err(|_| ConfigError::unsupported(ext, Some(path)))
    }

    /// Decode `content` in this format
    pub fn parse(self, content: &str, path: Option<&str>) -> Result<ConfigTree> {
        match self {
            ConfigFormat::Yaml => formats::yaml::parse_with_path(content, path),
            ConfigFormat::Toml => formats::toml::parse_with_path(content, path),
            ConfigFormat::Json => formats::json::parse_with_path(content, path),
        }
    }
}

impl FromStr for ConfigFormat {
    type Err = ConfigError;

    /// Accepts a type name or extension, case-insensitively, with or without the leading dot
    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "yml" | "yaml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::unsupported(s, None)),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Decode an in-memory document given its format name (`"yaml"`, `"toml"`, ...)
pub fn read_bytes(data: &[u8], format: &str) -> Result<ConfigTree> {
    let format: ConfigFormat = format.parse()?;
    let content = std::str::from_utf8(data).map_err(|source| ConfigError::InvalidUtf8 {
        format: format.to_string(),
        source,
    })?;
    format.parse(content, None)
}
