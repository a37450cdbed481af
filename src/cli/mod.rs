//! CLI module
//!
//! # Commands
//!
//! - `discover` - Print the stream catalog
//! - `read` - Extract records, emitting SCHEMA, RECORD and STATE messages

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{catalog_json, Runner};
