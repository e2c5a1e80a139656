//! Configuration merging logic
//!
//! Merges configuration trees with right-biased precedence. Used both when
//! layering several files and when overlaying attribute data onto the current
//! state.

use crate::value::{ConfigTree, Value};

/// Merge two trees, with `overlay` taking precedence
///
/// Maps present on both sides merge recursively. Every other collision is a
/// replacement: scalars and sequences from `overlay` clobber whatever `base`
/// held, and a map on one side never merges with a non-map on the other.
/// Keys only present in `base` survive unchanged.
///
/// Apply it as a left fold (`merge(merge(a, b), c)`) when layering files.
pub fn merge(mut base: ConfigTree, overlay: ConfigTree) -> ConfigTree {
    for (key, incoming) in overlay {
        let merged = match (base.remove(&key), incoming) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => {
                Value::Map(merge(existing, incoming))
            }
            (_, incoming) => incoming,
        };
        base.insert(key, merged);
    }
    base
}
