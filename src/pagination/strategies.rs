//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{extract_jsonpath_value, NextPage, PaginationCursor, PaginationState, Paginator};
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// Total Count Pagination
// ============================================================================

/// Total-count pagination (Jira `startAt` / `maxResults` / `total`)
///
/// Another page exists while `total > startAt + len(page)`. An absent or
/// `null` total ends pagination.
#[derive(Debug, Clone)]
pub struct TotalCountPaginator {
    /// JSONPath to the total field
    pub total_path: String,
    /// Requested page size
    pub page_size: u32,
}

impl TotalCountPaginator {
    /// Create a new total-count paginator
    pub fn new(total_path: impl Into<String>, page_size: u32) -> Self {
        Self {
            total_path: total_path.into(),
            page_size,
        }
    }

    fn read_total(&self, body: &Value, state: &PaginationState) -> Result<Option<u64>> {
        match extract_jsonpath_value(body, &self.total_path) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
                Error::protocol(
                    &state.stream,
                    format!("total must be a non-negative integer, got {n}"),
                )
            }),
            Some(other) => Err(Error::protocol(
                &state.stream,
                format!("total must be a number, got {other}"),
            )),
        }
    }
}

impl Paginator for TotalCountPaginator {
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(records_count);

        let Some(total) = self.read_total(body, state)? else {
            return Ok(state.finish());
        };

        let consumed = state.cursor.position() + records_count as u64;
        if total > consumed {
            state.advance(PaginationCursor::StartAt(consumed))
        } else {
            Ok(state.finish())
        }
    }
}

// ============================================================================
// Short Page Pagination
// ============================================================================

/// Short-page pagination
///
/// A full page means there may be more; a short or empty page ends the
/// result set.
#[derive(Debug, Clone)]
pub struct ShortPagePaginator {
    /// Requested page size
    pub page_size: u32,
}

impl ShortPagePaginator {
    /// Create a new short-page paginator
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }
}

impl Paginator for ShortPagePaginator {
    fn process_response(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(records_count);

        if records_count == 0 || records_count != self.page_size as usize {
            return Ok(state.finish());
        }

        let next = state.cursor.position() + records_count as u64;
        state.advance(PaginationCursor::Offset(next))
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn process_response(
        &self,
        _body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(records_count);
        Ok(state.finish())
    }
}
