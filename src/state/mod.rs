//! State management module
//!
//! Tracks the replication bookmark of every stream (and of every context of
//! a parameterized child stream) and persists it between runs so the next
//! sync resumes from the last value seen.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Singer-compatible bookmark document
//! - `StateManager` - Shared handle with atomic file checkpoints
//! - `compare_replication_values` - Ordering used to keep bookmarks monotonic

mod compare;
mod manager;
mod types;

pub use compare::{compare_replication_values, parse_local_timestamp, parse_timestamp};
pub use manager::StateManager;
pub use types::{Advance, Bookmark, PartitionState, State, StreamState};
