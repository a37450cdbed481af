//! Schema tests

use super::*;
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn test_properties_are_nullable() {
    let prop = SchemaProperty::integer();
    assert!(prop.is_nullable());
    assert_eq!(prop.json_type.primary_type(), Some(&JsonType::Integer));
}

#[test]
fn test_property_serialization() {
    let prop = SchemaProperty::date_time();
    assert_eq!(
        serde_json::to_value(&prop).unwrap(),
        json!({"type": ["string", "null"], "format": "date-time"})
    );

    let prop = SchemaProperty::array(SchemaProperty::string());
    assert_eq!(
        serde_json::to_value(&prop).unwrap(),
        json!({"type": ["array", "null"], "items": {"type": ["string", "null"]}})
    );
}

#[test]
fn test_boards_schema() {
    let schema = boards_schema();
    assert_eq!(schema.json_type, JsonType::Object);
    assert!(schema.get_property("id").is_some());

    let location = schema.get_property("location").unwrap();
    assert!(location.get_property("projectKey").is_some());
}

#[test]
fn test_issues_schema_without_custom_fields() {
    let schema = issues_schema(&BTreeMap::new());
    for name in ["id", "key", "updated", "sprint_id", "changelog", "fields"] {
        assert!(schema.get_property(name).is_some(), "missing {name}");
    }

    let updated = schema.get_property("updated").unwrap();
    assert_eq!(updated.format.as_deref(), Some("date-time"));

    let fields = schema.get_property("fields").unwrap();
    assert!(fields.get_property("summary").is_some());
    assert!(fields.get_property("customfield_10016").is_none());
}

#[test]
fn test_issues_schema_adds_custom_field_names() {
    let mut custom = BTreeMap::new();
    custom.insert("customfield_10016".to_string(), "story_points".to_string());
    custom.insert("customfield_10020".to_string(), "team".to_string());

    let schema = issues_schema(&custom);
    let fields = schema.get_property("fields").unwrap();

    let story_points = fields.get_property("story_points").unwrap();
    assert_eq!(story_points.json_type.primary_type(), Some(&JsonType::String));
    assert!(fields.get_property("team").is_some());
    assert!(fields.get_property("customfield_10016").is_none());
}

#[test]
fn test_schema_to_json() {
    let value = workflow_statuses_schema().to_json();
    assert_eq!(value["type"], json!("object"));
    assert_eq!(
        value["properties"]["statusCategory"]["properties"]["key"]["type"],
        json!(["string", "null"])
    );
}

#[test]
fn test_users_and_sprints_schema() {
    assert!(users_schema().get_property("accountId").is_some());
    let sprints = sprints_schema();
    assert_eq!(
        sprints.get_property("startDate").unwrap().format.as_deref(),
        Some("date-time")
    );
}
