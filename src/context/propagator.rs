//! Parent-to-child context derivation

use super::types::Context;
use crate::error::{Error, Result};
use crate::types::Record;
use serde_json::Value;

/// How a parent stream turns one of its records into a child context
///
/// The child context holds exactly one entry taken from the record; the
/// parent's own context is not carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRule {
    /// Field (dot path) read from the parent record
    pub parent_key: String,
    /// Name of the entry in the child context
    pub context_field: String,
}

impl ContextRule {
    /// Create a new rule
    pub fn new(parent_key: impl Into<String>, context_field: impl Into<String>) -> Self {
        Self {
            parent_key: parent_key.into(),
            context_field: context_field.into(),
        }
    }

    /// Derive the child context for one parent record
    ///
    /// Never mutates the parent record. Fails when the key field is absent,
    /// null, or not a scalar.
    pub fn derive(&self, parent_stream: &str, record: &Record) -> Result<Context> {
        let value = self.extract_key(record).ok_or_else(|| {
            Error::record_shape(
                parent_stream,
                format!("record has no '{}' to derive child context", self.parent_key),
            )
        })?;

        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                Ok(Context::new().with_value(self.context_field.clone(), value.clone()))
            }
            other => Err(Error::record_shape(
                parent_stream,
                format!("'{}' must be a scalar, got {other}", self.parent_key),
            )),
        }
    }

    /// Extract the key value from a record, following dot notation
    fn extract_key<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        let mut parts = self.parent_key.split('.');
        let mut current = record.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }
}
