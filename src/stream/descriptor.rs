//! Stream descriptors

use crate::context::Context;
use crate::error::{Error, Result};
use crate::pagination::{PaginationConfig, PaginationCursor};
use crate::schema::JsonSchema;
use crate::state::parse_local_timestamp;
use crate::template;
use crate::types::{ApiFamily, SyncMode};
use serde_json::Value;
use std::collections::BTreeMap;
use url::Url;

/// Tag selecting a stream's policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Issues,
    Users,
    Boards,
    Sprints,
    WorkflowStatuses,
}

/// How the replication lower bound is sent to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementalFilter {
    /// `<field> >= 'YYYY-MM-DD HH:MM'` clause in the `jql` parameter
    Jql { field: String },
    /// `<param>=<bound>` query parameter
    QueryParam { param: String },
}

/// Immutable definition of a stream
#[derive(Debug, Clone)]
pub struct StreamDescriptor {
    pub name: String,
    pub kind: StreamKind,
    pub api: ApiFamily,
    /// Path below the API base, with `{param}` placeholders
    pub path: String,
    pub primary_key: Vec<String>,
    pub replication_key: Option<String>,
    pub filter: Option<IncrementalFilter>,
    pub parent: Option<String>,
    /// JSONPath selecting the records of a page
    pub records_path: String,
    pub page_size: u32,
    pub pagination: PaginationConfig,
    /// Custom field id to name mapping applied during post-processing
    pub field_mapping: BTreeMap<String, String>,
    pub schema: JsonSchema,
}

impl StreamDescriptor {
    /// Create a descriptor with no pagination and `$[*]` extraction
    pub fn new(
        name: impl Into<String>,
        kind: StreamKind,
        api: ApiFamily,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            api,
            path: path.into(),
            primary_key: vec!["id".to_string()],
            replication_key: None,
            filter: None,
            parent: None,
            records_path: "$[*]".to_string(),
            page_size: 100,
            pagination: PaginationConfig::None,
            field_mapping: BTreeMap::new(),
            schema: JsonSchema::new(),
        }
    }

    #[must_use]
    pub fn with_primary_key(mut self, fields: &[&str]) -> Self {
        self.primary_key = fields.iter().map(ToString::to_string).collect();
        self
    }

    #[must_use]
    pub fn with_replication_key(
        mut self,
        key: impl Into<String>,
        filter: Option<IncrementalFilter>,
    ) -> Self {
        self.replication_key = Some(key.into());
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = path.into();
        self
    }

    /// Set pagination; the page size is taken from the config when it has one
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        if let Some(page_size) = pagination.page_size() {
            self.page_size = page_size;
        }
        self.pagination = pagination;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_field_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.field_mapping = mapping;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: JsonSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Incremental when a replication key is declared
    pub fn sync_mode(&self) -> SyncMode {
        if self.replication_key.is_some() {
            SyncMode::Incremental
        } else {
            SyncMode::FullRefresh
        }
    }

    /// Full request URL for a context
    pub fn request_url(&self, origin: &Url, context: &Context) -> Result<String> {
        let path = template::render(&self.path, context)?;
        let raw = format!(
            "{}{}{}",
            origin.as_str().trim_end_matches('/'),
            self.api.base_path(),
            path
        );
        Ok(Url::parse(&raw)?.to_string())
    }

    /// Query parameters for one page
    ///
    /// `lower_bound` is the bookmark (or the configured start date) and is
    /// only used when the stream declares a replication key.
    pub fn build_params(
        &self,
        cursor: &PaginationCursor,
        lower_bound: Option<&Value>,
    ) -> Result<Vec<(String, String)>> {
        let mut params = Vec::new();

        if let Some(start_at) = cursor.as_param() {
            params.push(("startAt".to_string(), start_at));
        }
        params.push(("maxResults".to_string(), self.page_size.to_string()));

        if let Some(key) = &self.replication_key {
            match &self.filter {
                Some(IncrementalFilter::Jql { field }) => {
                    let mut clauses = Vec::new();
                    if let Some(bound) = lower_bound {
                        clauses.push(format!("{field} >= '{}'", self.jql_timestamp(bound)?));
                    }
                    clauses.push(format!("ORDER BY {field} ASC"));
                    params.push(("jql".to_string(), clauses.join(" ")));
                }
                Some(IncrementalFilter::QueryParam { param }) => {
                    if let Some(bound) = lower_bound {
                        params.push((param.clone(), template::value_to_string(bound)));
                    }
                    push_ordering(&mut params, key);
                }
                None => push_ordering(&mut params, key),
            }
        }

        params.extend(self.kind.extra_params(&self.field_mapping));
        Ok(params)
    }

    /// Render a bound at JQL minute resolution
    ///
    /// The bound keeps the wall-clock time and offset it was written with.
    fn jql_timestamp(&self, bound: &Value) -> Result<String> {
        bound
            .as_str()
            .and_then(parse_local_timestamp)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .ok_or_else(|| {
                Error::state(format!(
                    "bookmark for '{}' is not a timestamp: {bound}",
                    self.name
                ))
            })
    }
}

fn push_ordering(params: &mut Vec<(String, String)>, key: &str) {
    params.push(("sort".to_string(), "asc".to_string()));
    params.push(("order_by".to_string(), key.to_string()));
}
