//! Tests for the context module

use super::*;
use crate::error::Error;
use crate::types::Record;
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_empty_context_has_no_key() {
    let ctx = Context::new();
    assert!(ctx.is_empty());
    assert_eq!(ctx.key(), None);
    assert_eq!(ctx.to_string(), "{}");
}

#[test]
fn test_context_key_is_canonical() {
    let a = Context::new().with_value("sprint_id", 7).with_value("board_id", 1);
    let b = Context::new().with_value("board_id", 1).with_value("sprint_id", 7);

    assert_eq!(a, b);
    assert_eq!(a.key(), Some(r#"{"board_id":1,"sprint_id":7}"#.to_string()));
    assert_eq!(a.key(), b.key());
}

#[test]
fn test_context_serializes_as_plain_object() {
    let ctx = Context::new().with_value("board_id", 10000);
    assert_eq!(serde_json::to_value(&ctx).unwrap(), json!({"board_id": 10000}));

    let restored: Context = serde_json::from_value(json!({"board_id": 10000})).unwrap();
    assert_eq!(restored, ctx);
}

#[test]
fn test_derive_board_context() {
    let rule = ContextRule::new("id", "board_id");
    let parent = record(json!({"id": 10000, "name": "Example Scrum Board"}));
    let before = parent.clone();

    let ctx = rule.derive("boards", &parent).unwrap();

    assert_eq!(ctx.get("board_id"), Some(&json!(10000)));
    assert_eq!(parent, before);
}

#[test]
fn test_derive_is_deterministic() {
    let rule = ContextRule::new("id", "board_id");
    let first = record(json!({"id": 1}));
    let second = record(json!({"id": 2}));

    let a1 = rule.derive("boards", &first).unwrap();
    let _ = rule.derive("boards", &second).unwrap();
    let a2 = rule.derive("boards", &first).unwrap();

    assert_eq!(a1, a2);
}

#[test]
fn test_derive_builds_fresh_context() {
    let rule = ContextRule::new("id", "sprint_id");

    let ctx = rule.derive("sprints", &record(json!({"id": 42}))).unwrap();

    assert_eq!(ctx, Context::new().with_value("sprint_id", 42));
    assert_eq!(ctx.key().as_deref(), Some(r#"{"sprint_id":42}"#));
    assert!(ctx.get("board_id").is_none());
}

#[test]
fn test_derive_nested_key() {
    let rule = ContextRule::new("location.projectId", "project_id");
    let ctx = rule
        .derive(
            "boards",
            &record(json!({"location": {"projectId": 10000}})),
        )
        .unwrap();
    assert_eq!(ctx.get("project_id"), Some(&json!(10000)));
}

#[test]
fn test_derive_missing_key_is_shape_error() {
    let rule = ContextRule::new("id", "board_id");

    let err = rule
        .derive("boards", &record(json!({"name": "x"})))
        .unwrap_err();
    assert!(matches!(err, Error::RecordShape { .. }));

    let err = rule
        .derive("boards", &record(json!({"id": null})))
        .unwrap_err();
    assert!(matches!(err, Error::RecordShape { .. }));

    let err = rule
        .derive("boards", &record(json!({"id": {"nested": 1}})))
        .unwrap_err();
    assert!(matches!(err, Error::RecordShape { .. }));
}
