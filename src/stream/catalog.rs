//! The Jira stream catalog

use super::descriptor::{IncrementalFilter, StreamDescriptor, StreamKind};
use crate::config::TapConfig;
use crate::pagination::PaginationConfig;
use crate::schema;
use crate::types::ApiFamily;

/// Standard issue fields requested alongside the custom fields
pub const ISSUE_FIELDS: &[&str] = &[
    "summary",
    "project",
    "status",
    "assignee",
    "issuetype",
    "parent",
    "sprint",
    "updated",
    "created",
    "labels",
];

/// All streams, in declaration order
pub fn jira_streams(config: &TapConfig) -> Vec<StreamDescriptor> {
    let page_size = config.page_size;

    vec![
        StreamDescriptor::new("issues", StreamKind::Issues, ApiFamily::Agile, "/board/{board_id}/issue")
            .with_parent("boards")
            .with_replication_key(
                "updated",
                Some(IncrementalFilter::Jql {
                    field: "updated".to_string(),
                }),
            )
            .with_records_path("$.issues[*]")
            .with_pagination(PaginationConfig::total_count(page_size))
            .with_field_mapping(config.custom_fields.clone())
            .with_schema(schema::issues_schema(&config.custom_fields)),
        StreamDescriptor::new("users", StreamKind::Users, ApiFamily::Platform, "/users")
            .with_primary_key(&["accountId"])
            .with_pagination(PaginationConfig::short_page(page_size))
            .with_schema(schema::users_schema()),
        StreamDescriptor::new("boards", StreamKind::Boards, ApiFamily::Agile, "/board")
            .with_records_path("$.values[*]")
            .with_pagination(PaginationConfig::total_count(page_size))
            .with_schema(schema::boards_schema()),
        StreamDescriptor::new("sprints", StreamKind::Sprints, ApiFamily::Agile, "/board/{board_id}/sprint")
            .with_parent("boards")
            .with_records_path("$.values[*]")
            .with_pagination(PaginationConfig::total_count(page_size))
            .with_schema(schema::sprints_schema()),
        StreamDescriptor::new(
            "workflow_statuses",
            StreamKind::WorkflowStatuses,
            ApiFamily::Platform,
            "/status",
        )
        .with_page_size(page_size)
        .with_schema(schema::workflow_statuses_schema()),
    ]
}
