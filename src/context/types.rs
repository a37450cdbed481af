//! Context type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameters propagated from a parent record to a child stream
///
/// Keys are kept sorted so the serialized form is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    /// Create an empty (top-level) context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check if this is the empty top-level context
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Canonical key for bookmark lookup, `None` for the top-level context
    pub fn key(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            serde_json::to_string(&self.values).ok()
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.key() {
            Some(key) => f.write_str(&key),
            None => f.write_str("{}"),
        }
    }
}
