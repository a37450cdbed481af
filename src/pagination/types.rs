//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use super::strategies::{NoPaginator, ShortPagePaginator, TotalCountPaginator};
use crate::error::{Error, Result};
use serde_json::Value;

/// Position of the next request within the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationCursor {
    /// First page, or an endpoint without pagination
    #[default]
    None,
    /// Offset derived from the size of the previous pages
    Offset(u64),
    /// Offset derived from the server-reported `total`
    StartAt(u64),
}

impl PaginationCursor {
    /// Number of records already consumed
    pub fn position(&self) -> u64 {
        match self {
            Self::None => 0,
            Self::Offset(n) | Self::StartAt(n) => *n,
        }
    }

    /// Value for the `startAt` query parameter, if one is needed
    pub fn as_param(&self) -> Option<String> {
        match self.position() {
            0 => None,
            n => Some(n.to_string()),
        }
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available, request the given cursor next
    Continue(PaginationCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Configuration for pagination behavior
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PaginationConfig {
    /// No pagination
    #[default]
    None,

    /// Continue while the reported total exceeds the records consumed
    TotalCount {
        /// JSONPath to the total field
        total_path: String,
        /// Requested page size
        page_size: u32,
    },

    /// Continue while pages come back full
    ShortPage {
        /// Requested page size
        page_size: u32,
    },
}

impl PaginationConfig {
    /// Create total-count pagination reading `$.total`
    pub fn total_count(page_size: u32) -> Self {
        Self::TotalCount {
            total_path: "$.total".to_string(),
            page_size,
        }
    }

    /// Create short-page pagination
    pub fn short_page(page_size: u32) -> Self {
        Self::ShortPage { page_size }
    }

    /// Requested page size, if paginated
    pub fn page_size(&self) -> Option<u32> {
        match self {
            Self::None => None,
            Self::TotalCount { page_size, .. } | Self::ShortPage { page_size } => Some(*page_size),
        }
    }

    /// Build a fresh paginator for one stream invocation
    pub fn build(&self) -> Result<Box<dyn Paginator>> {
        if self.page_size() == Some(0) {
            return Err(Error::invalid_value(
                "page_size",
                "page size must be greater than zero",
            ));
        }

        Ok(match self {
            Self::None => Box::new(NoPaginator),
            Self::TotalCount {
                total_path,
                page_size,
            } => Box::new(TotalCountPaginator::new(total_path.clone(), *page_size)),
            Self::ShortPage { page_size } => Box::new(ShortPagePaginator::new(*page_size)),
        })
    }
}

/// Tracks pagination state during one stream invocation
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Stream being paginated (for error reporting)
    pub stream: String,
    /// Cursor for the next request
    pub cursor: PaginationCursor,
    /// Pages processed so far
    pub pages: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record a processed page
    pub fn add_page(&mut self, records: usize) {
        self.pages += 1;
        self.total_fetched += records as u64;
    }

    /// Move to the next cursor, refusing to stand still or go backwards
    pub fn advance(&mut self, next: PaginationCursor) -> Result<NextPage> {
        let current = self.cursor.position();
        if next.position() <= current {
            return Err(Error::protocol(
                &self.stream,
                format!(
                    "pagination cursor did not advance (at {current}, next {})",
                    next.position()
                ),
            ));
        }
        self.cursor = next;
        Ok(NextPage::Continue(next))
    }

    /// Finish pagination
    pub fn finish(&mut self) -> NextPage {
        self.mark_done();
        NextPage::Done
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Process a response and determine if there's a next page
    ///
    /// `records_count` is the number of records extracted from this page.
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage>;
}

/// Extract a JSON value from a simple `$.a.b` path
pub(crate) fn extract_jsonpath_value<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
