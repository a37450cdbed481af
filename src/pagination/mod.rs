//! Pagination module
//!
//! Supports: total-count (`startAt` + `total`), short page, and unpaginated
//! endpoints.
//!
//! # Overview
//!
//! A paginator is a policy object created fresh for every stream
//! invocation. It reads each page response, decides whether another page
//! exists, and computes the cursor for the next request. The cursor lives
//! in `PaginationState`, which the stream owns.

mod strategies;
mod types;

pub use strategies::{NoPaginator, ShortPagePaginator, TotalCountPaginator};
pub use types::{NextPage, PaginationConfig, PaginationCursor, PaginationState, Paginator};

#[cfg(test)]
mod tests;
