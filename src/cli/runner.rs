//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::sink::StdoutSink;
use crate::state::StateManager;
use crate::stream::{jira_streams, StreamDescriptor};
use crate::types::{CancelToken, SyncMode};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: CancelToken,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: CancelToken::new(),
        }
    }

    /// Share a cancellation token with the caller (e.g. a Ctrl-C handler)
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover => self.discover(),
            Commands::Read { max_records, .. } => self.read(*max_records).await,
        }
    }

    /// Load configuration; inline JSON takes precedence over the file
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json) = &self.cli.config_json {
            return TapConfig::from_json(json);
        }
        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "No configuration given (use --config or --config-json)",
            )),
        }
    }

    /// Load state
    ///
    /// A state file is also the checkpoint target; inline state stays in
    /// memory and is only reported through STATE messages.
    fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Print the stream catalog
    fn discover(&self) -> Result<()> {
        let config = self.load_config()?;
        let streams = jira_streams(&config);
        self.output_message(&catalog_json(&streams));
        Ok(())
    }

    /// Sync the selected streams to stdout
    async fn read(&self, max_records: Option<usize>) -> Result<()> {
        let config = self.load_config()?;
        let state = self.load_state()?;

        let client = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
        let streams = jira_streams(&config);

        let mut sync_config = SyncConfig::new().with_cancel(self.cancel.clone());
        if let Some(selected) = self.cli.command.selected_streams() {
            sync_config = sync_config.with_streams(selected);
        }
        if let Some(max) = max_records {
            sync_config = sync_config.with_max_records(max);
        }
        if let Some(start_date) = config.start_date() {
            sync_config = sync_config.with_start_date(start_date);
        }

        let mut engine = SyncEngine::new(Arc::new(client), state, streams, config.origin()?)
            .with_config(sync_config);

        let mut sink = match self.cli.format {
            OutputFormat::Json => StdoutSink::new(),
            OutputFormat::Pretty => StdoutSink::pretty(),
        };

        let stats = engine.run(&mut sink).await?;
        info!(
            records = stats.records_synced,
            dropped = stats.records_dropped,
            pages = stats.pages_fetched,
            duration_ms = stats.duration_ms,
            "Read finished"
        );
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Singer-style catalog document for the given streams
pub fn catalog_json(streams: &[StreamDescriptor]) -> Value {
    let entries: Vec<Value> = streams
        .iter()
        .map(|stream| {
            let replication_method = match stream.sync_mode() {
                SyncMode::Incremental => "INCREMENTAL",
                SyncMode::FullRefresh => "FULL_TABLE",
            };
            json!({
                "tap_stream_id": stream.name,
                "stream": stream.name,
                "schema": stream.schema.to_json(),
                "key_properties": stream.primary_key,
                "replication_key": stream.replication_key,
                "replication_method": replication_method,
                "parent_stream": stream.parent,
            })
        })
        .collect();

    json!({ "streams": entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config() -> TapConfig {
        TapConfig::from_json(r#"{"username": "u", "api_key": "k", "domain": "example.atlassian.net"}"#)
            .unwrap()
    }

    #[test]
    fn test_catalog_json() {
        let catalog = catalog_json(&jira_streams(&config()));
        let streams = catalog["streams"].as_array().unwrap();

        let names: Vec<&str> = streams
            .iter()
            .map(|s| s["stream"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["issues", "users", "boards", "sprints", "workflow_statuses"]
        );

        let issues = &streams[0];
        assert_eq!(issues["replication_key"], json!("updated"));
        assert_eq!(issues["replication_method"], json!("INCREMENTAL"));
        assert_eq!(issues["parent_stream"], json!("boards"));
        assert_eq!(issues["schema"]["type"], json!("object"));

        let users = &streams[1];
        assert_eq!(users["key_properties"], json!(["accountId"]));
        assert_eq!(users["replication_method"], json!("FULL_TABLE"));
        assert_eq!(users["parent_stream"], Value::Null);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let runner = Runner::new(Cli::try_parse_from(["tap-jira", "discover"]).unwrap());
        assert!(matches!(runner.load_config(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_inline_state_stays_in_memory() {
        let cli = Cli::try_parse_from([
            "tap-jira",
            "read",
            "--state-json",
            r#"{"bookmarks": {}}"#,
        ])
        .unwrap();
        let state = Runner::new(cli).load_state().unwrap();
        assert!(state.is_in_memory());
    }
}
