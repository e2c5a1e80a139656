//! YAML format parser

use super::into_tree;
use crate::{error::ConfigError, value::Value, ConfigTree, Result};
use tracing::warn;

/// Parse configuration from YAML string
pub fn parse(content: &str) -> Result<ConfigTree> {
    parse_with_path(content, None)
}

/// Parse configuration from YAML string with file path for better errors
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<ConfigTree> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| ConfigError::from_yaml_error(e, content, path))?;
    into_tree(convert(doc), path)
}

fn convert(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Seq(items.into_iter().map(convert).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut tree = ConfigTree::new();
            for (key, value) in mapping {
                match key_to_string(&key) {
                    Some(key) => {
                        tree.insert(key, convert(value));
                    }
                    None => warn!(?key, "skipping YAML entry with a non-scalar key"),
                }
            }
            Value::Map(tree)
        }
        serde_yaml::Value::Tagged(tagged) => convert(tagged.value),
    }
}

/// Scalar keys are stringified; `1: one` is addressable as `"1"`
fn key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => key_to_string(&tagged.value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_yaml() {
        let yaml = r#"
Hacker: true
name: steve
hobbies:
- skateboarding
- snowboarding
clothing:
  jacket: leather
age: 35
"#;
        let tree = parse(yaml).unwrap();
        assert_eq!(tree["Hacker"], Value::Bool(true));
        assert_eq!(tree["age"], Value::Int(35));
        assert_eq!(
            tree["hobbies"],
            Value::from(vec!["skateboarding", "snowboarding"])
        );
        assert!(tree["clothing"].is_map());
    }

    #[test]
    fn test_parse_empty_yaml() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("{}").unwrap().is_empty());
    }

    #[test]
    fn test_numeric_keys_are_stringified() {
        let tree = parse("1: one\ntrue: yes").unwrap();
        assert_eq!(tree["1"], Value::from("one"));
        assert_eq!(tree["true"], Value::from("yes"));
    }

    #[test]
    fn test_parse_invalid_yaml_shows_line() {
        let yaml = "a: b\nc: [unclosed\n";
        let err = parse_with_path(yaml, Some("broken.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::YamlError { .. }));
        assert!(err.to_string().contains("in broken.yaml"));
    }

    #[test]
    fn test_scalar_root_rejected() {
        let err = parse("just a string").unwrap_err();
        assert!(matches!(err, ConfigError::NotAMap { .. }));
    }
}
