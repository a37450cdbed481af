//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs. The
//! layout follows the Singer bookmark document:
//!
//! ```json
//! {"bookmarks": {"issues": {"partitions": [{"context": {"board_id": 1},
//!   "replication_key": "updated", "replication_key_value": "..."}]}}}
//! ```

use super::compare::compare_replication_values;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Complete bookmark document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamState>,
}

/// Outcome of offering a candidate value to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Candidate was greater and has been stored
    Advanced,
    /// Candidate was not greater than the stored value
    Unchanged,
    /// Candidate cannot be ordered against the stored value
    Incomparable,
}

/// A single bookmark entry, flattened for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub stream: String,
    pub context: Option<Context>,
    pub replication_key: String,
    pub replication_key_value: Value,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.bookmarks.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.bookmarks.entry(stream.to_string()).or_default()
    }

    /// Stored replication value for a stream and context
    pub fn bookmark(&self, stream: &str, context: &Context) -> Option<&Value> {
        let stream_state = self.get_stream(stream)?;
        if context.is_empty() {
            stream_state.replication_key_value.as_ref()
        } else {
            stream_state
                .get_partition(context)?
                .replication_key_value
                .as_ref()
        }
    }

    /// Offer a replication value, storing it only if it is strictly greater
    pub fn advance(
        &mut self,
        stream: &str,
        context: &Context,
        replication_key: &str,
        candidate: &Value,
    ) -> Advance {
        if candidate.is_null() {
            return Advance::Incomparable;
        }

        let stream_state = self.get_stream_mut(stream);
        let (key_slot, value_slot) = if context.is_empty() {
            (
                &mut stream_state.replication_key,
                &mut stream_state.replication_key_value,
            )
        } else {
            let partition = stream_state.get_partition_mut(context);
            (
                &mut partition.replication_key,
                &mut partition.replication_key_value,
            )
        };

        let outcome = match value_slot.as_ref() {
            None => Advance::Advanced,
            Some(stored) => match compare_replication_values(candidate, stored) {
                Some(Ordering::Greater) => Advance::Advanced,
                Some(_) => Advance::Unchanged,
                None => Advance::Incomparable,
            },
        };

        if outcome == Advance::Advanced {
            *key_slot = Some(replication_key.to_string());
            *value_slot = Some(candidate.clone());
        }
        outcome
    }

    /// All bookmarks, flattened
    pub fn entries(&self) -> Vec<Bookmark> {
        let mut entries = Vec::new();
        for (stream, stream_state) in &self.bookmarks {
            if let (Some(key), Some(value)) = (
                &stream_state.replication_key,
                &stream_state.replication_key_value,
            ) {
                entries.push(Bookmark {
                    stream: stream.clone(),
                    context: None,
                    replication_key: key.clone(),
                    replication_key_value: value.clone(),
                });
            }
            for partition in &stream_state.partitions {
                if let (Some(key), Some(value)) =
                    (&partition.replication_key, &partition.replication_key_value)
                {
                    entries.push(Bookmark {
                        stream: stream.clone(),
                        context: Some(partition.context.clone()),
                        replication_key: key.clone(),
                        replication_key_value: value.clone(),
                    });
                }
            }
        }
        entries
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamState {
    /// Replication key of the top-level invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// Maximum replication value of the top-level invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<Value>,

    /// Per-context bookmarks of a child stream
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<PartitionState>,
}

impl StreamState {
    /// Get partition state
    pub fn get_partition(&self, context: &Context) -> Option<&PartitionState> {
        self.partitions.iter().find(|p| &p.context == context)
    }

    /// Get mutable partition state, creating if needed
    pub fn get_partition_mut(&mut self, context: &Context) -> &mut PartitionState {
        let index = match self.partitions.iter().position(|p| &p.context == context) {
            Some(index) => index,
            None => {
                self.partitions.push(PartitionState::new(context.clone()));
                self.partitions.len() - 1
            }
        };
        &mut self.partitions[index]
    }
}

/// Bookmark of one context of a child stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionState {
    pub context: Context,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key_value: Option<Value>,
}

impl PartitionState {
    /// Create an empty partition for a context
    pub fn new(context: Context) -> Self {
        Self {
            context,
            replication_key: None,
            replication_key_value: None,
        }
    }
}
