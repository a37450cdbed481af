//! Tests for pagination module

use super::*;
use crate::error::Error;
use serde_json::{json, Value};
use test_case::test_case;

/// Drive a paginator over canned pages, returning the cursors requested
fn drive(paginator: &dyn Paginator, pages: &[(Value, usize)]) -> (Vec<PaginationCursor>, usize) {
    let mut state = PaginationState::new("test");
    let mut requested = vec![state.cursor];
    let mut visited = 0;

    for (body, count) in pages {
        visited += 1;
        match paginator.process_response(body, *count, &mut state).unwrap() {
            NextPage::Continue(cursor) => requested.push(cursor),
            NextPage::Done => break,
        }
    }
    (requested, visited)
}

// ============================================================================
// Cursor / NextPage Tests
// ============================================================================

#[test]
fn test_cursor_position_and_param() {
    assert_eq!(PaginationCursor::None.position(), 0);
    assert_eq!(PaginationCursor::None.as_param(), None);
    assert_eq!(PaginationCursor::Offset(0).as_param(), None);
    assert_eq!(PaginationCursor::Offset(100).as_param(), Some("100".to_string()));
    assert_eq!(PaginationCursor::StartAt(50).position(), 50);
}

#[test]
fn test_next_page_predicates() {
    let next = NextPage::Continue(PaginationCursor::StartAt(1));
    assert!(next.is_continue());
    assert!(!next.is_done());
    assert!(NextPage::Done.is_done());
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::new("boards");
    assert_eq!(state.stream, "boards");
    assert_eq!(state.cursor, PaginationCursor::None);
    assert_eq!(state.pages, 0);
    assert_eq!(state.total_fetched, 0);
    assert!(!state.done);
}

#[test]
fn test_state_refuses_non_advancing_cursor() {
    let mut state = PaginationState::new("boards");
    state.advance(PaginationCursor::StartAt(10)).unwrap();

    let err = state.advance(PaginationCursor::StartAt(10)).unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation { ref stream, .. } if stream == "boards"));

    let err = state.advance(PaginationCursor::StartAt(5)).unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation { .. }));
    assert_eq!(state.cursor, PaginationCursor::StartAt(10));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_page_size() {
    assert_eq!(PaginationConfig::None.page_size(), None);
    assert_eq!(PaginationConfig::total_count(100).page_size(), Some(100));
    assert_eq!(PaginationConfig::short_page(25).page_size(), Some(25));
}

#[test]
fn test_config_rejects_zero_page_size() {
    assert!(matches!(
        PaginationConfig::short_page(0).build(),
        Err(Error::InvalidConfigValue { .. })
    ));
    assert!(PaginationConfig::total_count(0).build().is_err());
    assert!(PaginationConfig::None.build().is_ok());
}

// ============================================================================
// Total Count Paginator Tests
// ============================================================================

#[test]
fn test_total_count_continues_until_total() {
    let paginator = TotalCountPaginator::new("$.total", 2);
    let pages = vec![
        (json!({"total": 5}), 2),
        (json!({"total": 5}), 2),
        (json!({"total": 5}), 1),
    ];

    let (requested, visited) = drive(&paginator, &pages);
    assert_eq!(visited, 3);
    assert_eq!(
        requested,
        vec![
            PaginationCursor::None,
            PaginationCursor::StartAt(2),
            PaginationCursor::StartAt(4),
        ]
    );
}

#[test_case(json!({"total": null}) ; "null total")]
#[test_case(json!({"values": []}) ; "absent total")]
fn test_total_count_fails_closed_without_total(body: Value) {
    let paginator = TotalCountPaginator::new("$.total", 1);
    let mut state = PaginationState::new("issues");

    let next = paginator.process_response(&body, 1, &mut state).unwrap();
    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.pages, 1);
}

#[test_case(json!({"total": -1}) ; "negative total")]
#[test_case(json!({"total": 2.5}) ; "fractional total")]
#[test_case(json!({"total": "10"}) ; "string total")]
fn test_total_count_rejects_inconsistent_total(body: Value) {
    let paginator = TotalCountPaginator::new("$.total", 1);
    let mut state = PaginationState::new("issues");

    let err = paginator.process_response(&body, 1, &mut state).unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation { .. }));
}

#[test]
fn test_total_count_empty_page_with_more_remaining_is_fatal() {
    let paginator = TotalCountPaginator::new("$.total", 10);
    let mut state = PaginationState::new("issues");

    let err = paginator
        .process_response(&json!({"total": 30}), 0, &mut state)
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation { .. }));
}

#[test]
fn test_total_count_nested_path() {
    let paginator = TotalCountPaginator::new("$.page.total", 1);
    let mut state = PaginationState::new("issues");

    let next = paginator
        .process_response(&json!({"page": {"total": 2}}), 1, &mut state)
        .unwrap();
    assert_eq!(next, NextPage::Continue(PaginationCursor::StartAt(1)));
}

#[test_case(0, 10 ; "empty result set")]
#[test_case(1, 10 ; "single short page")]
#[test_case(10, 10 ; "exactly one full page")]
#[test_case(25, 10 ; "partial last page")]
#[test_case(6, 1 ; "one record per page")]
fn test_total_count_visits_each_page_once(total: u64, page_size: u32) {
    let paginator = TotalCountPaginator::new("$.total", page_size);
    let mut state = PaginationState::new("boards");
    let mut visited = 0u64;
    let bound = total.div_ceil(u64::from(page_size)) + 1;

    loop {
        visited += 1;
        assert!(visited <= bound, "exceeded iteration bound");
        let remaining = total - state.cursor.position();
        let count = remaining.min(u64::from(page_size)) as usize;
        match paginator
            .process_response(&json!({"total": total}), count, &mut state)
            .unwrap()
        {
            NextPage::Continue(_) => {}
            NextPage::Done => break,
        }
    }

    assert_eq!(state.total_fetched, total);
    assert_eq!(visited, total.div_ceil(u64::from(page_size)).max(1));
}

// ============================================================================
// Short Page Paginator Tests
// ============================================================================

#[test]
fn test_short_page_continues_on_full_page() {
    let paginator = ShortPagePaginator::new(2);
    let pages = vec![(json!([]), 2), (json!([]), 2), (json!([]), 1)];

    let (requested, visited) = drive(&paginator, &pages);
    assert_eq!(visited, 3);
    assert_eq!(
        requested,
        vec![
            PaginationCursor::None,
            PaginationCursor::Offset(2),
            PaginationCursor::Offset(4),
        ]
    );
}

#[test_case(0 ; "empty page")]
#[test_case(3 ; "short page")]
fn test_short_page_stops(count: usize) {
    let paginator = ShortPagePaginator::new(5);
    let mut state = PaginationState::new("users");

    let next = paginator.process_response(&json!([]), count, &mut state).unwrap();
    assert!(next.is_done());
    assert_eq!(state.cursor, PaginationCursor::None);
}

#[test]
fn test_short_page_oversized_page_stops() {
    let paginator = ShortPagePaginator::new(5);
    let mut state = PaginationState::new("users");

    let next = paginator.process_response(&json!([]), 7, &mut state).unwrap();
    assert!(next.is_done());
}

// ============================================================================
// No Paginator Tests
// ============================================================================

#[test]
fn test_no_paginator_single_request() {
    let paginator = NoPaginator;
    let mut state = PaginationState::new("workflow_statuses");

    let next = paginator
        .process_response(&json!([{"id": "1"}]), 1, &mut state)
        .unwrap();
    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.total_fetched, 1);
}
