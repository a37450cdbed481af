//! Stream schema module
//!
//! JSON schemas for every stream in the catalog. Schemas are immutable
//! values built once from the configuration and announced in a `SCHEMA`
//! message before a stream's records.

mod catalog;
mod types;

pub use catalog::{
    boards_schema, issues_schema, sprints_schema, users_schema, workflow_statuses_schema,
};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};

#[cfg(test)]
mod tests;
