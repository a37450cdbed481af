//! Engine types
//!
//! Configuration and statistics for the sync driver.

use crate::types::CancelToken;
use std::collections::BTreeSet;

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Streams to emit; `None` emits every stream
    pub selected: Option<BTreeSet<String>>,
    /// Maximum records per stream invocation
    pub max_records: Option<usize>,
    /// Lower bound for replicated streams without a bookmark
    pub start_date: Option<String>,
    /// Cooperative cancellation
    pub cancel: CancelToken,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict emission to the given streams
    #[must_use]
    pub fn with_streams<I, S>(mut self, streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = Some(streams.into_iter().map(Into::into).collect());
        self
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    #[must_use]
    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Whether records of `stream` reach the sink
    pub fn is_selected(&self, stream: &str) -> bool {
        self.selected.as_ref().map_or(true, |s| s.contains(stream))
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Records that passed key checks
    pub records_synced: usize,
    /// Records dropped for a missing primary or replication key
    pub records_dropped: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Completed stream invocations (one per context)
    pub invocations: usize,
    /// Errors encountered
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    pub fn add_dropped(&mut self, count: usize) {
        self.records_dropped += count;
    }

    /// Add pages
    pub fn add_pages(&mut self, count: usize) {
        self.pages_fetched += count;
    }

    pub fn add_invocation(&mut self) {
        self.invocations += 1;
    }

    /// Add an error
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
