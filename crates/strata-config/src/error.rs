//! Error types for configuration loading and binding

pub mod format;

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use format::ErrorFormatter;

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading files or binding sources
///
/// A key that resolves nowhere is not an error; getters report it as absent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Extension or explicit type is not one of the supported formats
    #[error("Unsupported configuration format {format:?}{location}\nSupported formats: .yml, .yaml, .toml, .json")]
    UnsupportedFormat { format: String, location: String },

    /// YAML parsing error with context
    #[error("Failed to parse YAML configuration{location}:\n{message}\n{context}")]
    YamlError {
        location: String,
        message: String,
        context: String,
    },

    /// TOML parsing error with context
    #[error("Failed to parse TOML configuration{location}:\n{message}\n{context}")]
    TomlError {
        location: String,
        message: String,
        context: String,
    },

    /// JSON parsing error with context
    #[error("Failed to parse JSON configuration{location}:\n{message}\n{context}")]
    JsonError {
        location: String,
        message: String,
        context: String,
    },

    /// IO error
    #[error("Failed to read configuration file: {path}\n{source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// In-memory document is not valid UTF-8
    #[error("Configuration data for format {format} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        format: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// Document decoded, but its root is not a map
    #[error("Configuration document{location} must be a map at the top level, found {found}")]
    NotAMap { location: String, found: String },

    /// Binding requested without a key
    #[error("Cannot bind an empty key")]
    EmptyKey,

    /// No candidate file exists in any search path
    #[error("Configuration file {name:?} not found in: {searched}")]
    ConfigNotFound { name: String, searched: String },

    /// One or more paths failed during a multi-path load
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl ConfigError {
    /// Create an unsupported-format error, optionally naming the file
    pub fn unsupported(format: impl Into<String>, path: Option<&Path>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            location: location(path.and_then(Path::to_str)),
        }
    }

    /// Create a YAML error from serde_yaml::Error
    pub fn from_yaml_error(err: serde_yaml::Error, content: &str, path: Option<&str>) -> Self {
        let (_location, context) = extract_yaml_context(&err, content);
        Self::YamlError {
            location: location(path),
            message: err.to_string(),
            context,
        }
    }

    /// Create a TOML error from toml::de::Error
    pub fn from_toml_error(err: toml::de::Error, content: &str, path: Option<&str>) -> Self {
        let context = extract_toml_context(&err, content);
        Self::TomlError {
            location: location(path),
            message: err.message().to_string(),
            context,
        }
    }

    /// Create a JSON error from serde_json::Error
    pub fn from_json_error(err: serde_json::Error, content: &str, path: Option<&str>) -> Self {
        let context = extract_json_context(&err, content);
        Self::JsonError {
            location: location(path),
            message: err.to_string(),
            context,
        }
    }

    pub fn not_a_map(found: &str, path: Option<&str>) -> Self {
        Self::NotAMap {
            location: location(path),
            found: found.to_string(),
        }
    }
}

fn location(path: Option<&str>) -> String {
    path.map(|p| format!(" in {}", p)).unwrap_or_default()
}

/// A single path that failed during [`crate::Resolver::read_paths`]
#[derive(Debug)]
pub struct PathFailure {
    pub path: PathBuf,
    pub error: ConfigError,
}

/// Aggregate of every path that failed to read or parse during a multi-path load
///
/// Loading continues past each failure, so the resolver still holds everything
/// that did load when this is returned.
#[derive(Debug, Default)]
pub struct LoadError {
    failures: Vec<PathFailure>,
}

impl LoadError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, error: ConfigError) {
        self.failures.push(PathFailure {
            path: path.into(),
            error,
        });
    }

    pub fn failures(&self) -> &[PathFailure] {
        &self.failures
    }

    /// Paths that failed, in load order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.failures.iter().map(|f| f.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Load(self))
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to load {} configuration path(s):",
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n  {}: {}", failure.path.display(), failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadError {}

/// Excerpt of up to three lines around `line_num` (1-based), marking the failing line
fn excerpt(content: &str, line_num: usize, column: Option<usize>) -> String {
    let lines: Vec<&str> = content.lines().collect();

    if line_num == 0 || line_num > lines.len() {
        return String::new();
    }

    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            if num == line_num {
                let mut result = format!("→ {:3} | {}", num, line);
                if let Some(col) = column.filter(|c| *c > 0) {
                    result.push_str(&format!("\n      {}^", " ".repeat(col - 1)));
                }
                result
            } else {
                format!("  {:3} | {}", num, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract context from YAML error
fn extract_yaml_context(err: &serde_yaml::Error, content: &str) -> (String, String) {
    match err.location() {
        Some(loc) => {
            let context = excerpt(content, loc.line(), None);
            if context.is_empty() {
                (String::new(), String::new())
            } else {
                (format!(" at line {}", loc.line()), context)
            }
        }
        None => (String::new(), String::new()),
    }
}

/// Extract context from TOML error
fn extract_toml_context(err: &toml::de::Error, content: &str) -> String {
    match err.span() {
        Some(span) if span.start <= content.len() => {
            let line_num = content[..span.start].matches('\n').count() + 1;
            excerpt(content, line_num, None)
        }
        _ => String::new(),
    }
}

/// Extract context from JSON error
fn extract_json_context(err: &serde_json::Error, content: &str) -> String {
    excerpt(content, err.line(), Some(err.column()))
}
