//! The three tiers of the precedence chain
//!
//! Highest first: flag overrides, environment bindings, attributes
//! (file data, defaults and explicit sets).

pub mod attributes;
pub mod env;
pub mod flags;

pub use attributes::AttributeStore;
pub use env::{env_var_name, EnvBindingStore, EnvLookup, ProcessEnv};
pub use flags::{flag_default, FlagValue, OverrideStore};
