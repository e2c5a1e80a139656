//! Format decoders
//!
//! Each decoder turns a document into a [`ConfigTree`]. The document root must
//! be a map; anything else is reported as [`ConfigError::NotAMap`].

pub mod json;
pub mod toml;
pub mod yaml;

use crate::{error::ConfigError, value::Value, ConfigTree, Result};

/// Unwrap a decoded document root into a tree
pub(crate) fn into_tree(root: Value, path: Option<&str>) -> Result<ConfigTree> {
    match root {
        Value::Map(tree) => Ok(tree),
        Value::Null => Ok(ConfigTree::new()),
        other => Err(ConfigError::not_a_map(other.type_name(), path)),
    }
}
