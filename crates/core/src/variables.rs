//! Global story variable store.
//!
//! Variables are named booleans that gate branch traversal. A name that was
//! never set reads as `false`, which blocks any branch that lists it as a
//! precondition; there is no externally observable third state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping of variable name to boolean value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableStore {
    values: BTreeMap<String, bool>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a variable; absent names read as `false`.
    pub fn is_true(&self, name: &str) -> bool {
        self.values.get(name).copied().unwrap_or(false)
    }

    /// Sets a variable to `true`, inserting it if absent.
    pub fn set_true(&mut self, name: &str) {
        self.values.insert(name.to_string(), true);
    }

    /// Sets a variable to `false`, inserting it if absent.
    pub fn set_false(&mut self, name: &str) {
        self.values.insert(name.to_string(), false);
    }

    /// Number of variables that have been explicitly set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been set yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates explicitly set variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
