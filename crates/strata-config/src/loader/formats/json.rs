//! JSON format parser

use super::into_tree;
use crate::{error::ConfigError, value::Value, ConfigTree, Result};

/// Parse configuration from JSON string
pub fn parse(content: &str) -> Result<ConfigTree> {
    parse_with_path(content, None)
}

/// Parse configuration from JSON string with file path for better errors
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<ConfigTree> {
    let doc: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| ConfigError::from_json_error(e, content, path))?;
    into_tree(convert(doc), path)
}

fn convert(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Seq(items.into_iter().map(convert).collect()),
        serde_json::Value::Object(map) => {
            Value::Map(map.into_iter().map(|(k, v)| (k, convert(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_json() {
        let json = r#"{
            "id": "0001",
            "ppu": 0.55,
            "batters": { "batter": [ { "type": "Regular" } ] }
        }"#;
        let tree = parse(json).unwrap();
        assert_eq!(tree["id"], Value::from("0001"));
        assert_eq!(tree["ppu"], Value::Float(0.55));
        assert!(tree["batters"].is_map());
    }

    #[test]
    fn test_parse_json_array_root_rejected() {
        let err = parse_with_path("[1, 2]", Some("list.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMap { .. }));
    }
}
