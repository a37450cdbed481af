//! Decoder implementations

use crate::error::{Error, Result};
use serde_json::Value;

/// Trait for extracting records from a parsed response body
pub trait RecordDecoder: Send + Sync {
    /// Extract the list of records from the response body
    fn decode(&self, body: &Value) -> Result<Vec<Value>>;
}

/// JSON decoder extracting records at a record path
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: String,
}

impl JsonDecoder {
    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &Value) -> Result<Vec<Value>> {
        let path = self.record_path.as_str();
        if path.contains('*') {
            return extract_with_jsonpath(body, path);
        }
        match extract_simple_path(body, path) {
            Some(Value::Array(arr)) => Ok(arr.clone()),
            Some(Value::Null) | None => Ok(vec![]),
            Some(v) => Ok(vec![v.clone()]),
        }
    }
}

/// Extract a value using a dot-notation path
fn extract_simple_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim_start_matches('$').trim_start_matches('.');
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
