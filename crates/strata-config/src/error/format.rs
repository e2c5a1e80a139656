//! Enhanced error formatting with colors and context

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

/// Format error with colors and context
pub struct ErrorFormatter<'a> {
    error: &'a ConfigError,
    use_colors: bool,
}

impl<'a> ErrorFormatter<'a> {
    /// Create a new error formatter
    pub fn new(error: &'a ConfigError) -> Self {
        Self {
            error,
            use_colors: supports_color(),
        }
    }

    /// Force plain output regardless of the terminal
    pub fn plain(error: &'a ConfigError) -> Self {
        Self {
            error,
            use_colors: false,
        }
    }

    /// Format the error with colors and context
    pub fn format(&self) -> String {
        if self.use_colors {
            format_colored(self.error)
        } else {
            self.error.to_string()
        }
    }
}

fn format_colored(error: &ConfigError) -> String {
    match error {
        ConfigError::Load(load) => {
            let header = format!(
                "{} {} configuration path(s) failed to load",
                Paint::red("✗").bold(),
                load.len()
            );
            let mut out = vec![header];
            for failure in load.failures() {
                let path_str = failure.path.display().to_string();
                out.push(format!(
                    "  {} {}\n    {}",
                    Paint::yellow("→"),
                    Paint::cyan(&path_str),
                    format_colored(&failure.error).replace('\n', "\n    ")
                ));
            }
            out.join("\n")
        }
        ConfigError::IoError { path, source } => {
            let path_str = path.display().to_string();
            format!(
                "{} Cannot read {}: {}",
                Paint::red("✗").bold(),
                Paint::yellow(&path_str),
                source
            )
        }
        ConfigError::UnsupportedFormat { format, location } => {
            let format_str = format!("'{}'", format);
            format!(
                "{} Unsupported format {}{}\n  {}: yml, yaml, toml, json",
                Paint::red("✗").bold(),
                Paint::yellow(&format_str),
                location,
                Paint::new("Supported").bold(),
            )
        }
        ConfigError::NotAMap { location, found } => {
            format!(
                "{} Document{} must be a map, found {}",
                Paint::red("✗").bold(),
                location,
                Paint::yellow(found)
            )
        }
        ConfigError::ConfigNotFound { name, searched } => {
            format!(
                "{} Configuration {} not found\n  {}: {}",
                Paint::red("✗").bold(),
                Paint::yellow(name),
                Paint::new("Searched").bold(),
                searched
            )
        }
        other => format!("{} {}", Paint::red("✗").bold(), other),
    }
}

/// Check if terminal supports colors
fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    atty::is(atty::Stream::Stderr)
}

impl fmt::Display for ErrorFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use std::sync::Mutex;

    #[test]
    fn test_plain_format_matches_display() {
        let error = ConfigError::unsupported("ini", None);
        let output = ErrorFormatter::plain(&error).format();
        assert_eq!(output, error.to_string());
        assert!(output.contains("\"ini\""));
    }

    #[test]
    fn test_colored_load_error_names_paths() {
        let mut load = LoadError::new();
        load.push("missing.yaml", ConfigError::EmptyKey);
        let error = ConfigError::Load(load);
        let output = format_colored(&error);
        assert!(output.contains("missing.yaml"));
        assert!(output.contains("1 configuration path(s)"));
    }

    // Serializes tests that touch NO_COLOR
    static NO_COLOR_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_no_color_disables_colors() {
        let _lock = NO_COLOR_LOCK.lock().unwrap();
        let previous = std::env::var("NO_COLOR").ok();
        std::env::set_var("NO_COLOR", "1");

        assert!(!supports_color());
        let error = ConfigError::unsupported("ini", None);
        assert_eq!(ErrorFormatter::new(&error).format(), error.to_string());

        match previous {
            Some(value) => std::env::set_var("NO_COLOR", value),
            None => std::env::remove_var("NO_COLOR"),
        }
    }
}
