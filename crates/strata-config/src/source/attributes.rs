//! Attribute tier: file data, defaults and explicit sets in one tree

use crate::index::MaterializedIndex;
use crate::loader::merge::merge;
use crate::value::{ConfigTree, Value};
use std::collections::BTreeSet;
use tracing::trace;

/// Owns a configuration tree and the case-insensitive index over it
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    data: ConfigTree,
    index: MaterializedIndex,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `path` case-insensitively
    ///
    /// A canonical key that literally contains dots is tried first; otherwise
    /// the path is walked segment by segment. Walking into a non-map is a miss.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let canonical = self.index.resolve(path)?;

        if let Some(value) = self.data.get(canonical) {
            return Some(value);
        }

        let mut segments = canonical.split('.');
        let first = segments.next()?;
        let mut current = self.data.get(first)?;
        for segment in segments {
            match current {
                Value::Map(children) => current = children.get(segment)?,
                _ => {
                    trace!(path = canonical, "attempted deep access of a non-map");
                    return None;
                }
            }
        }
        Some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Store `value` under the literal top-level key `path`. Dots are not split.
    ///
    /// Any top-level key with the same case-folded spelling is replaced, as are
    /// dotted literal keys naming a path that `value` now defines.
    pub fn set(&mut self, path: &str, value: Value) {
        let stale: Vec<String> = self
            .data
            .keys()
            .filter(|key| same_key(key, path) || shadowed_by(key, path, &value))
            .cloned()
            .collect();

        if stale.is_empty() {
            self.index.update(path, &value);
            self.data.insert(path.to_string(), value);
            return;
        }

        for key in &stale {
            trace!(key = %key, path, "replacing key shadowed by set");
            self.data.remove(key);
        }
        self.data.insert(path.to_string(), value);
        self.index.rebuild(&self.data);
    }

    /// Replace the whole tree and rebuild the index
    pub fn from_string_map(&mut self, data: ConfigTree) {
        self.data = data;
        self.index.rebuild(&self.data);
    }

    pub fn to_string_map(&self) -> &ConfigTree {
        &self.data
    }

    pub fn index(&self) -> &MaterializedIndex {
        &self.index
    }

    /// Move the tree out, leaving the store empty
    pub fn take(&mut self) -> ConfigTree {
        self.index.clear();
        std::mem::take(&mut self.data)
    }

    /// Deep-merge `overlay` onto the current tree
    ///
    /// Literal dotted top-level keys whose path the overlay now defines through
    /// nesting are dropped, so a file value replaces an earlier `set("a.b", ..)`
    /// instead of hiding behind it. Overlay keys that differ from an existing
    /// key only in case merge into the existing spelling.
    pub fn merge_overlay(&mut self, overlay: ConfigTree) {
        let shadowed: Vec<String> = self
            .data
            .keys()
            .filter(|key| key.contains('.') && nested_path_exists(&overlay, key))
            .cloned()
            .collect();

        let mut base = self.take();
        for key in shadowed {
            trace!(key = %key, "dropping dotted key shadowed by merged data");
            base.remove(&key);
        }
        let overlay = align_keys(&base, overlay);
        self.from_string_map(merge(base, overlay));
    }

    /// Every canonical path reachable by descending through maps
    pub fn all_keys(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        collect_keys(&self.data, "", &mut keys);
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn collect_keys(tree: &ConfigTree, prefix: &str, keys: &mut BTreeSet<String>) {
    for (key, value) in tree {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        if let Value::Map(children) = value {
            collect_keys(children, &path, keys);
        }
        keys.insert(path);
    }
}

/// Keys compare with the same case folding the index applies
fn same_key(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Rename overlay keys to the spelling `base` already uses, recursively through maps
fn align_keys(base: &ConfigTree, overlay: ConfigTree) -> ConfigTree {
    overlay
        .into_iter()
        .map(|(key, value)| {
            let Some((existing, current)) = base.iter().find(|(existing, _)| same_key(existing, &key))
            else {
                return (key, value);
            };
            let value = match (current, value) {
                (Value::Map(current), Value::Map(incoming)) => {
                    Value::Map(align_keys(current, incoming))
                }
                (_, value) => value,
            };
            (existing.clone(), value)
        })
        .collect()
}

/// Whether the dotted literal `key` names a path below `path` that `value` defines
fn shadowed_by(key: &str, path: &str, value: &Value) -> bool {
    let Some(children) = value.as_map() else {
        return false;
    };
    if !key.contains('.') {
        return false;
    }

    let mut segments = key.split('.');
    for prefix in path.split('.') {
        match segments.next() {
            Some(segment) if same_key(segment, prefix) => {}
            _ => return false,
        }
    }
    let rest: Vec<&str> = segments.collect();
    !rest.is_empty() && nested_path_exists(children, &rest.join("."))
}

/// Whether `dotted` names a nested path in `tree`, compared case-insensitively
fn nested_path_exists(tree: &ConfigTree, dotted: &str) -> bool {
    let mut current = tree;
    let mut segments = dotted.split('.').peekable();
    while let Some(segment) = segments.next() {
        let found = current
            .iter()
            .find(|(key, _)| same_key(key, segment))
            .map(|(_, value)| value);
        match (found, segments.peek()) {
            (Some(_), None) => return true,
            (Some(Value::Map(children)), Some(_)) => current = children,
            _ => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ConfigTree {
        let mut clothing = ConfigTree::new();
        clothing.insert("Jacket".to_string(), Value::from("leather"));
        clothing.insert("trousers".to_string(), Value::from("denim"));

        let mut tree = ConfigTree::new();
        tree.insert("Clothing".to_string(), Value::Map(clothing));
        tree.insert("name".to_string(), Value::from("steve"));
        tree.insert("hobbies".to_string(), Value::from(vec!["go"]));
        tree
    }

    #[test]
    fn test_get_nested_case_insensitive() {
        let mut store = AttributeStore::new();
        store.from_string_map(sample());
        assert_eq!(store.get("clothing.jacket"), Some(&Value::from("leather")));
        assert_eq!(store.get("CLOTHING.JACKET"), Some(&Value::from("leather")));
        assert!(store.get("clothing").unwrap().is_map());
        assert_eq!(store.get("state"), None);
    }

    #[test]
    fn test_set_keeps_literal_dotted_key() {
        let mut store = AttributeStore::new();
        store.set("Clothing.Jacket", Value::from("leather"));

        assert_eq!(store.get("clothing.jacket"), Some(&Value::from("leather")));
        assert_eq!(store.get("CLOTHING.JACKET"), Some(&Value::from("leather")));
        assert!(store.to_string_map().contains_key("Clothing.Jacket"));
        assert_eq!(store.get("clothing"), None);
    }

    #[test]
    fn test_set_map_indexes_descendants() {
        let mut store = AttributeStore::new();
        let mut db = ConfigTree::new();
        db.insert("Host".to_string(), Value::from("localhost"));
        store.set("Database", Value::Map(db));
        assert_eq!(store.get("database.host"), Some(&Value::from("localhost")));
    }

    #[test]
    fn test_walk_through_non_map_misses() {
        let mut store = AttributeStore::new();
        store.from_string_map(sample());
        // index knows nothing below a sequence
        assert_eq!(store.get("hobbies.0"), None);
    }

    #[test]
    fn test_all_keys_includes_intermediates() {
        let mut store = AttributeStore::new();
        store.from_string_map(sample());
        let keys: Vec<_> = store.all_keys().into_iter().collect();
        assert_eq!(
            keys,
            vec![
                "Clothing",
                "Clothing.Jacket",
                "Clothing.trousers",
                "hobbies",
                "name"
            ]
        );
    }

    #[test]
    fn test_merge_overlay_evicts_shadowed_dotted_key() {
        let mut store = AttributeStore::new();
        store.set("clothing.jacket", Value::from("poncho"));
        store.set("age", Value::from(99));

        store.merge_overlay(sample());
        assert_eq!(store.get("clothing.jacket"), Some(&Value::from("leather")));
        assert!(!store.to_string_map().contains_key("clothing.jacket"));
        assert_eq!(store.get("age"), Some(&Value::from(99)));
    }

    #[test]
    fn test_merge_overlay_keeps_unrelated_dotted_key() {
        let mut store = AttributeStore::new();
        store.set("clothing.hat", Value::from("fedora"));
        store.merge_overlay(sample());
        assert_eq!(store.get("clothing.hat"), Some(&Value::from("fedora")));
    }

    fn assert_index_rebuildable(store: &AttributeStore) {
        assert_eq!(
            *store.index(),
            MaterializedIndex::from_tree(store.to_string_map())
        );
    }

    #[test]
    fn test_set_replaces_case_variant() {
        let mut store = AttributeStore::new();
        store.from_string_map(sample());
        store.set("Name", Value::from("override"));

        assert!(!store.to_string_map().contains_key("name"));
        assert_eq!(store.get("name"), Some(&Value::from("override")));
        assert_index_rebuildable(&store);

        store.merge_overlay(ConfigTree::from([("other".to_string(), Value::from(1))]));
        assert_eq!(store.get("name"), Some(&Value::from("override")));
    }

    #[test]
    fn test_set_map_evicts_dotted_literal_it_defines() {
        let mut store = AttributeStore::new();
        store.set("a.b", Value::from(1));
        store.set(
            "A",
            Value::Map(ConfigTree::from([("b".to_string(), Value::from(2))])),
        );

        assert_eq!(store.get("a.b"), Some(&Value::from(2)));
        assert!(!store.to_string_map().contains_key("a.b"));
        assert_index_rebuildable(&store);
    }

    #[test]
    fn test_replacing_map_drops_stale_descendants() {
        let mut store = AttributeStore::new();
        store.set(
            "db",
            Value::Map(ConfigTree::from([("host".to_string(), Value::from("x"))])),
        );
        store.set("db", Value::from("sqlite"));

        assert_eq!(store.get("db.host"), None);
        assert_index_rebuildable(&store);
    }

    #[test]
    fn test_merge_overlay_keeps_existing_spelling() {
        let mut store = AttributeStore::new();
        store.set("hacker", Value::from(false));
        store.set("clothing.hat", Value::from("fedora"));
        store.merge_overlay(sample());
        store.merge_overlay(ConfigTree::from([("Hacker".to_string(), Value::from(true))]));

        assert_eq!(store.get("hacker"), Some(&Value::from(true)));
        assert!(!store.to_string_map().contains_key("Hacker"));
        assert_index_rebuildable(&store);
    }

    #[test]
    fn test_merge_overlay_aligns_nested_keys() {
        let mut store = AttributeStore::new();
        store.from_string_map(sample());

        let clothing = ConfigTree::from([("JACKET".to_string(), Value::from("peacoat"))]);
        store.merge_overlay(ConfigTree::from([(
            "clothing".to_string(),
            Value::Map(clothing),
        )]));

        assert_eq!(store.get("clothing.jacket"), Some(&Value::from("peacoat")));
        assert_eq!(store.get("clothing.trousers"), Some(&Value::from("denim")));
        assert_eq!(
            store.all_keys().into_iter().filter(|k| k.starts_with("Clothing")).count(),
            3
        );
    }

    #[test]
    fn test_non_ascii_dotted_key_evicted() {
        let mut store = AttributeStore::new();
        store.set("straße.ÄRZTE", Value::from("old"));

        let nested = ConfigTree::from([("ärzte".to_string(), Value::from("new"))]);
        store.merge_overlay(ConfigTree::from([("STRAßE".to_string(), Value::Map(nested))]));

        assert!(!store.to_string_map().contains_key("straße.ÄRZTE"));
        assert_eq!(store.get("straße.ärzte"), Some(&Value::from("new")));
    }

    #[test]
    fn test_from_string_map_replaces_index() {
        let mut store = AttributeStore::new();
        store.from_string_map(sample());
        store.from_string_map(ConfigTree::new());
        assert_eq!(store.get("name"), None);
        assert!(store.is_empty());
    }
}
