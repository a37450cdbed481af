//! Kind-specific stream policies

use super::catalog::ISSUE_FIELDS;
use super::descriptor::StreamKind;
use super::remap::remap;
use crate::context::ContextRule;
use crate::error::{Error, Result};
use crate::http::PageResponse;
use crate::types::Record;
use serde_json::Value;
use std::collections::BTreeMap;

const NO_SPRINT_SUPPORT: &str = "The board does not support sprints";

impl StreamKind {
    /// Parameters sent on every page in addition to the common ones
    pub fn extra_params(self, field_mapping: &BTreeMap<String, String>) -> Vec<(String, String)> {
        match self {
            StreamKind::Issues => {
                let mut params = vec![
                    ("expand".to_string(), "changelog".to_string()),
                    ("fieldsByKeys".to_string(), "true".to_string()),
                ];
                params.extend(
                    ISSUE_FIELDS
                        .iter()
                        .copied()
                        .chain(field_mapping.keys().map(String::as_str))
                        .map(|field| ("fields".to_string(), field.to_string())),
                );
                params.push(("validateQuery".to_string(), "strict".to_string()));
                params
            }
            _ => Vec::new(),
        }
    }

    /// Transform a raw record before it is checked and emitted
    pub fn post_process(self, record: Record, field_mapping: &BTreeMap<String, String>) -> Record {
        match self {
            StreamKind::Issues => post_process_issue(record, field_mapping),
            _ => record,
        }
    }

    /// How a record of this kind becomes a child context
    pub fn child_context_rule(self) -> Option<ContextRule> {
        match self {
            StreamKind::Boards => Some(ContextRule::new("id", "board_id")),
            StreamKind::Sprints => Some(ContextRule::new("id", "sprint_id")),
            _ => None,
        }
    }

    /// Decide what a non-2xx response means
    ///
    /// `Ok(())` treats the page as an empty result; anything else is fatal.
    pub fn handle_error_status(self, response: &PageResponse) -> Result<()> {
        if self == StreamKind::Sprints && response.status == 400 && is_no_sprint_support(response)
        {
            return Ok(());
        }
        Err(Error::http_status(response.status, response.body.clone()))
    }
}

fn is_no_sprint_support(response: &PageResponse) -> bool {
    let Ok(body) = response.json() else {
        return false;
    };
    match body.get("errorMessages").and_then(Value::as_array) {
        Some(messages) => messages.len() == 1 && messages[0] == NO_SPRINT_SUPPORT,
        None => false,
    }
}

/// Remap custom fields, then lift `updated` and `sprint_id` to the top level
fn post_process_issue(record: Record, field_mapping: &BTreeMap<String, String>) -> Record {
    let mut record = remap(record, field_mapping);

    let fields = record.get("fields");
    let updated = fields.and_then(|f| f.get("updated")).cloned();
    let sprint_id = fields
        .and_then(|f| f.get("sprint"))
        .and_then(|sprint| sprint.get("id"))
        .cloned()
        .unwrap_or(Value::Null);

    if let Some(updated) = updated {
        record.insert("updated".to_string(), updated);
    }
    record.insert("sprint_id".to_string(), sprint_id);
    record
}
