//! Case-insensitive materialized-path index
//!
//! Maps lowercase dotted paths (`database.host`) to the canonical spelling
//! present in a [`ConfigTree`] (`Database.Host`). Stored keys keep their
//! original case; only lookups are folded.
//!
//! The index is a cache. It holds no values and [`MaterializedIndex::rebuild`]
//! regenerates it from the tree at any time.

use crate::value::{ConfigTree, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializedIndex {
    paths: HashMap<String, String>,
}

impl MaterializedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index for every path reachable in `tree`
    pub fn from_tree(tree: &ConfigTree) -> Self {
        let mut index = Self::new();
        index.rebuild(tree);
        index
    }

    /// Insert or refresh `path` and, when `value` is a map, every descendant path.
    ///
    /// Null, scalar and sequence values get an entry but stop the descent.
    pub fn update(&mut self, path: &str, value: &Value) {
        self.paths.insert(path.to_lowercase(), path.to_string());

        if let Value::Map(children) = value {
            for (child_key, child) in children {
                let joined = if path.is_empty() {
                    child_key.clone()
                } else {
                    format!("{}.{}", path, child_key)
                };
                self.update(&joined, child);
            }
        }
    }

    /// Clear and repopulate from scratch.
    ///
    /// Top-level keys that literally contain a dot are indexed last, so an
    /// explicitly written `"a.b"` key owns the `a.b` entry over a nested
    /// `a: { b }` path of the same spelling. Among dotted keys the deeper
    /// literal wins over a descendant of a shallower one.
    pub fn rebuild(&mut self, tree: &ConfigTree) {
        self.paths.clear();

        let (mut dotted, plain): (Vec<_>, Vec<_>) =
            tree.iter().partition(|(key, _)| key.contains('.'));
        dotted.sort_by_key(|(key, _)| key.matches('.').count());
        for (key, value) in plain.into_iter().chain(dotted) {
            self.update(key, value);
        }
    }

    /// Canonical path for `query`, compared case-insensitively. No partial matching.
    pub fn resolve(&self, query: &str) -> Option<&str> {
        self.paths.get(&query.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ConfigTree {
        let mut database = ConfigTree::new();
        database.insert("Host".to_string(), Value::from("localhost"));
        database.insert("Pool".to_string(), Value::Null);

        let mut tree = ConfigTree::new();
        tree.insert("Database".to_string(), Value::Map(database));
        tree.insert("hobbies".to_string(), Value::from(vec!["go"]));
        tree
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let index = MaterializedIndex::from_tree(&tree());
        assert_eq!(index.resolve("database.host"), Some("Database.Host"));
        assert_eq!(index.resolve("DATABASE.HOST"), Some("Database.Host"));
        assert_eq!(index.resolve("database"), Some("Database"));
    }

    #[test]
    fn test_null_gets_entry_without_descent() {
        let index = MaterializedIndex::from_tree(&tree());
        assert_eq!(index.resolve("database.pool"), Some("Database.Pool"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_no_partial_matching() {
        let index = MaterializedIndex::from_tree(&tree());
        assert_eq!(index.resolve("data"), None);
        assert_eq!(index.resolve("hobbies.0"), None);
    }

    #[test]
    fn test_dotted_literal_key_wins_collision() {
        let mut t = tree();
        t.insert("database.HOST".to_string(), Value::from("override"));
        let index = MaterializedIndex::from_tree(&t);
        assert_eq!(index.resolve("database.host"), Some("database.HOST"));
    }

    #[test]
    fn test_deeper_dotted_literal_wins_over_descendant() {
        let mut nested = ConfigTree::new();
        nested.insert("c".to_string(), Value::from(1));

        let mut t = ConfigTree::new();
        t.insert("a.b".to_string(), Value::Map(nested));
        t.insert("A.b.c".to_string(), Value::from(2));
        let index = MaterializedIndex::from_tree(&t);
        assert_eq!(index.resolve("a.b.c"), Some("A.b.c"));
    }

    #[test]
    fn test_rebuild_drops_stale_paths() {
        let mut index = MaterializedIndex::from_tree(&tree());
        index.rebuild(&ConfigTree::new());
        assert!(index.is_empty());
    }
}
