//! TOML format parser

use super::into_tree;
use crate::{error::ConfigError, value::parse_time, value::Value, ConfigTree, Result};

/// Parse configuration from TOML string
pub fn parse(content: &str) -> Result<ConfigTree> {
    parse_with_path(content, None)
}

/// Parse configuration from TOML string with file path for better errors
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<ConfigTree> {
    let doc: ::toml::Table =
        ::toml::from_str(content).map_err(|e| ConfigError::from_toml_error(e, content, path))?;
    into_tree(convert(::toml::Value::Table(doc)), path)
}

fn convert(value: ::toml::Value) -> Value {
    match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::Int(i),
        ::toml::Value::Float(f) => Value::Float(f),
        ::toml::Value::Boolean(b) => Value::Bool(b),
        // Offset datetimes, local datetimes and dates become times; a bare
        // time of day has no date to anchor it and stays a string.
        ::toml::Value::Datetime(dt) => {
            let rendered = dt.to_string();
            match parse_time(&rendered) {
                Some(t) => Value::Time(t),
                None => Value::String(rendered),
            }
        }
        ::toml::Value::Array(items) => Value::Seq(items.into_iter().map(convert).collect()),
        ::toml::Value::Table(table) => {
            Value::Map(table.into_iter().map(|(k, v)| (k, convert(v))).collect())
        }
    }
}
