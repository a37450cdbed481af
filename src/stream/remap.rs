//! Custom field remapping

use crate::types::Record;
use serde_json::Value;
use std::collections::BTreeMap;

/// Rename opaque keys of the record's `fields` object using `mapping`
///
/// Keys found in the mapping are replaced by their names; the opaque keys
/// do not survive. Records without a `fields` object pass through.
pub fn remap(mut record: Record, mapping: &BTreeMap<String, String>) -> Record {
    if mapping.is_empty() {
        return record;
    }

    if let Some(Value::Object(fields)) = record.get_mut("fields") {
        for (id, name) in mapping {
            if let Some(value) = fields.remove(id) {
                fields.insert(name.clone(), value);
            }
        }
    }
    record
}
