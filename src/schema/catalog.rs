//! Schemas of the Jira streams

use super::types::{JsonSchema, SchemaProperty};
use std::collections::BTreeMap;

fn user_property() -> SchemaProperty {
    SchemaProperty::object([
        ("displayName", SchemaProperty::string()),
        ("emailAddress", SchemaProperty::string()),
        ("accountId", SchemaProperty::string()),
        ("active", SchemaProperty::boolean()),
    ])
}

fn issue_type_property() -> SchemaProperty {
    SchemaProperty::object([
        ("id", SchemaProperty::string()),
        ("name", SchemaProperty::string()),
        ("subtask", SchemaProperty::boolean()),
        ("hierarchyLevel", SchemaProperty::integer()),
    ])
}

fn status_property() -> SchemaProperty {
    SchemaProperty::object([
        ("id", SchemaProperty::string()),
        ("name", SchemaProperty::string()),
        ("statusCategory", status_category_property()),
    ])
}

fn status_category_property() -> SchemaProperty {
    SchemaProperty::object([
        ("id", SchemaProperty::integer()),
        ("key", SchemaProperty::string()),
        ("name", SchemaProperty::string()),
    ])
}

pub fn boards_schema() -> JsonSchema {
    JsonSchema::new()
        .with_property("id", SchemaProperty::integer())
        .with_property("name", SchemaProperty::string())
        .with_property("type", SchemaProperty::string())
        .with_property(
            "location",
            SchemaProperty::object([
                ("projectId", SchemaProperty::integer()),
                ("displayName", SchemaProperty::string()),
                ("projectName", SchemaProperty::string()),
                ("projectKey", SchemaProperty::string()),
                ("projectTypeKey", SchemaProperty::string()),
                ("name", SchemaProperty::string()),
            ]),
        )
}

pub fn sprints_schema() -> JsonSchema {
    JsonSchema::new()
        .with_property("id", SchemaProperty::integer())
        .with_property("name", SchemaProperty::string())
        .with_property("state", SchemaProperty::string())
        .with_property("startDate", SchemaProperty::date_time())
        .with_property("endDate", SchemaProperty::date_time())
        .with_property("completeDate", SchemaProperty::date_time())
        .with_property("originBoardId", SchemaProperty::integer())
        .with_property("goal", SchemaProperty::string())
}

pub fn users_schema() -> JsonSchema {
    JsonSchema::new()
        .with_property("accountId", SchemaProperty::string())
        .with_property("accountType", SchemaProperty::string())
        .with_property("displayName", SchemaProperty::string())
        .with_property("active", SchemaProperty::boolean())
        .with_property("emailAddress", SchemaProperty::string())
}

pub fn workflow_statuses_schema() -> JsonSchema {
    JsonSchema::new()
        .with_property("id", SchemaProperty::string())
        .with_property("name", SchemaProperty::string())
        .with_property("description", SchemaProperty::string())
        .with_property("statusCategory", status_category_property())
}

/// Issues schema
///
/// Each configured custom field name becomes a nullable string inside
/// `fields`, next to the standard fields it is requested with.
pub fn issues_schema(custom_fields: &BTreeMap<String, String>) -> JsonSchema {
    let change_item = SchemaProperty::object([
        ("field", SchemaProperty::string()),
        ("fieldtype", SchemaProperty::string()),
        ("from", SchemaProperty::string()),
        ("fromString", SchemaProperty::string()),
        ("to", SchemaProperty::string()),
        ("toString", SchemaProperty::string()),
    ]);
    let history = SchemaProperty::object([
        ("id", SchemaProperty::string()),
        ("issueId", SchemaProperty::string()),
        ("created", SchemaProperty::date_time()),
        ("author", user_property()),
        ("items", SchemaProperty::array(change_item)),
    ]);

    let parent = SchemaProperty::object([
        ("id", SchemaProperty::string()),
        ("key", SchemaProperty::string()),
        (
            "fields",
            SchemaProperty::object([
                ("summary", SchemaProperty::string()),
                ("issuetype", issue_type_property()),
                ("status", status_property()),
            ]),
        ),
    ]);

    let mut fields: Vec<(String, SchemaProperty)> = vec![
        ("summary".into(), SchemaProperty::string()),
        (
            "project".into(),
            SchemaProperty::object([
                ("id", SchemaProperty::string()),
                ("key", SchemaProperty::string()),
                ("name", SchemaProperty::string()),
                ("projectTypeKey", SchemaProperty::string()),
            ]),
        ),
        ("status".into(), status_property()),
        ("assignee".into(), user_property()),
        ("issuetype".into(), issue_type_property()),
        ("parent".into(), parent),
        ("created".into(), SchemaProperty::date_time()),
        ("labels".into(), SchemaProperty::array(SchemaProperty::string())),
    ];
    fields.extend(
        custom_fields
            .values()
            .map(|name| (name.clone(), SchemaProperty::string())),
    );

    JsonSchema::new()
        .with_property("id", SchemaProperty::string())
        .with_property("key", SchemaProperty::string())
        .with_property("updated", SchemaProperty::date_time())
        .with_property("sprint_id", SchemaProperty::integer())
        .with_property(
            "changelog",
            SchemaProperty::object([("histories", SchemaProperty::array(history))]),
        )
        .with_property("fields", SchemaProperty::object(fields))
}
