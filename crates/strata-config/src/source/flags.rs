//! Override tier backed by command-line flags
//!
//! The flag parser owns the flags. This tier only keeps shared handles and
//! asks them whether the user actually passed a value.

use crate::value::{parse_bool, parse_int, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// What the resolver needs from a command-line flag
pub trait FlagValue: Send + Sync {
    /// Current value rendered as a string
    fn value_string(&self) -> String;

    /// Declared type, e.g. `"string"`, `"int"`, `"bool"`
    fn type_tag(&self) -> &str;

    /// True only when the user set the flag explicitly
    fn changed(&self) -> bool;
}

/// The value a flag contributes to the default tier, typed by its declared type
pub fn flag_default(flag: &dyn FlagValue) -> Value {
    let raw = flag.value_string();
    match flag.type_tag() {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" => Value::Int(parse_int(&raw).unwrap_or(0)),
        "bool" => Value::Bool(parse_bool(&raw).unwrap_or(false)),
        _ => Value::String(raw),
    }
}

/// Bound keys and their flag handles
#[derive(Default, Clone)]
pub struct OverrideStore {
    flags: BTreeMap<String, Arc<dyn FlagValue>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: &str, flag: Arc<dyn FlagValue>) {
        self.flags.insert(key.to_lowercase(), flag);
    }

    /// The flag's live value, but only once the user has changed it
    pub fn get(&self, key: &str) -> Option<Value> {
        let flag = self.flags.get(&key.to_lowercase())?;
        flag.changed().then(|| Value::String(flag.value_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }
}

impl fmt::Debug for OverrideStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.flags.iter().map(|(key, flag)| {
                let rendered = format!(
                    "{} ({}, changed: {})",
                    flag.value_string(),
                    flag.type_tag(),
                    flag.changed()
                );
                (key, rendered)
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubFlag {
        value: Mutex<(String, bool)>,
        type_tag: &'static str,
    }

    impl StubFlag {
        fn new(value: &str, type_tag: &'static str) -> Arc<Self> {
            Arc::new(Self {
                value: Mutex::new((value.to_string(), false)),
                type_tag,
            })
        }

        fn set(&self, value: &str) {
            *self.value.lock().unwrap() = (value.to_string(), true);
        }
    }

    impl FlagValue for StubFlag {
        fn value_string(&self) -> String {
            self.value.lock().unwrap().0.clone()
        }

        fn type_tag(&self) -> &str {
            self.type_tag
        }

        fn changed(&self) -> bool {
            self.value.lock().unwrap().1
        }
    }

    #[test]
    fn test_unchanged_flag_misses() {
        let flag = StubFlag::new("testing", "string");
        let mut store = OverrideStore::new();
        store.bind("testvalue", flag.clone());
        assert_eq!(store.get("testvalue"), None);

        flag.set("testing_mutate");
        assert_eq!(store.get("testValue"), Some(Value::from("testing_mutate")));
    }

    #[test]
    fn test_flag_default_typed_by_tag() {
        assert_eq!(flag_default(&*StubFlag::new("1138", "int")), Value::Int(1138));
        assert_eq!(flag_default(&*StubFlag::new("7", "uint16")), Value::Int(7));
        assert_eq!(flag_default(&*StubFlag::new("true", "bool")), Value::Bool(true));
        assert_eq!(flag_default(&*StubFlag::new("oops", "int")), Value::Int(0));
        assert_eq!(
            flag_default(&*StubFlag::new("1.5", "float64")),
            Value::from("1.5")
        );
    }
}
