//! Execution engine module
//!
//! Drives the stream graph.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Runs root streams in declaration order and fans out to
//!   children depth-first, one invocation per parent record
//! - `SyncConfig` - Stream selection, record limit, start date, cancellation
//! - `SyncStats` - Counters for the finished run
//!
//! The bookmark document is checkpointed after every invocation and before
//! a failed or cancelled run returns.

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::context::Context;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::sink::{Message, RecordSink};
use crate::state::StateManager;
use crate::stream::{run_invocation, RunOptions, StreamDescriptor};
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use url::Url;

/// Sync driver
pub struct SyncEngine {
    transport: Arc<dyn Transport>,
    state: StateManager,
    streams: Arc<Vec<StreamDescriptor>>,
    origin: Url,
    config: SyncConfig,
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine over streams in declaration order
    pub fn new(
        transport: Arc<dyn Transport>,
        state: StateManager,
        streams: Vec<StreamDescriptor>,
        origin: Url,
    ) -> Self {
        Self {
            transport,
            state,
            streams: Arc::new(streams),
            origin,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Run every root stream to completion
    ///
    /// The first failure aborts the run after the state is checkpointed.
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<SyncStats> {
        let start = Instant::now();
        self.stats = SyncStats::default();

        let active = self.active_streams()?;
        self.emit_schemas(sink).await?;

        let roots: Vec<usize> = self
            .streams
            .iter()
            .enumerate()
            .filter(|(_, s)| s.parent.is_none() && active.contains(s.name.as_str()))
            .map(|(index, _)| index)
            .collect();

        for index in roots {
            if let Err(e) = self.run_stream(index, Context::new(), &active, sink).await {
                self.stats.add_error();
                if let Err(checkpoint_err) = self.state.checkpoint().await {
                    error!("Failed to checkpoint state after error: {checkpoint_err}");
                }
                return Err(e);
            }
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        info!(
            records = self.stats.records_synced,
            dropped = self.stats.records_dropped,
            pages = self.stats.pages_fetched,
            invocations = self.stats.invocations,
            "Sync complete"
        );
        Ok(self.stats.clone())
    }

    /// Streams that must run: selected ones plus their ancestors
    fn active_streams(&self) -> Result<BTreeSet<String>> {
        if let Some(selected) = &self.config.selected {
            for name in selected {
                if !self.streams.iter().any(|s| &s.name == name) {
                    return Err(Error::StreamNotFound {
                        stream: name.clone(),
                    });
                }
            }
        }

        let mut active = BTreeSet::new();
        for stream in self.streams.iter() {
            if !self.config.is_selected(&stream.name) {
                continue;
            }
            let mut current = Some(stream);
            while let Some(s) = current {
                if !active.insert(s.name.clone()) {
                    break;
                }
                current = s
                    .parent
                    .as_deref()
                    .and_then(|p| self.streams.iter().find(|c| c.name == p));
            }
        }
        Ok(active)
    }

    async fn emit_schemas(&self, sink: &mut dyn RecordSink) -> Result<()> {
        for stream in self.streams.iter() {
            if self.config.is_selected(&stream.name) {
                sink.emit(Message::schema(
                    &stream.name,
                    stream.schema.clone(),
                    stream.primary_key.clone(),
                    stream.replication_key.iter().cloned().collect(),
                ))
                .await?;
            }
        }
        Ok(())
    }

    /// Run one invocation, checkpoint, then recurse into the children
    fn run_stream<'a>(
        &'a mut self,
        index: usize,
        context: Context,
        active: &'a BTreeSet<String>,
        sink: &'a mut dyn RecordSink,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            let streams = Arc::clone(&self.streams);
            let descriptor = &streams[index];
            let children: Vec<usize> = streams
                .iter()
                .enumerate()
                .filter(|(_, s)| {
                    s.parent.as_deref() == Some(descriptor.name.as_str())
                        && active.contains(s.name.as_str())
                })
                .map(|(i, _)| i)
                .collect();

            info!(stream = %descriptor.name, context = %context, "Starting stream");
            let start_date = self.config.start_date.clone().map(Value::String);
            let options = RunOptions {
                origin: &self.origin,
                start_date: start_date.as_ref(),
                emit: self.config.is_selected(&descriptor.name),
                collect: !children.is_empty(),
                max_records: self.config.max_records,
                cancel: &self.config.cancel,
            };
            let outcome = run_invocation(
                descriptor,
                &context,
                options,
                self.transport.as_ref(),
                &self.state,
                &mut *sink,
            )
            .await?;

            self.stats.add_records(outcome.produced);
            self.stats.add_dropped(outcome.dropped);
            self.stats.add_pages(outcome.pages as usize);
            self.stats.add_invocation();

            self.state.checkpoint().await?;
            sink.emit(Message::state(self.state.snapshot().await)).await?;
            info!(
                stream = %descriptor.name,
                context = %context,
                records = outcome.produced,
                "Completed stream"
            );

            if children.is_empty() {
                return Ok(());
            }
            let rule = descriptor.kind.child_context_rule().ok_or_else(|| {
                Error::config(format!(
                    "stream '{}' has child streams but no context rule",
                    descriptor.name
                ))
            })?;

            for record in &outcome.records {
                let child_context = match rule.derive(&descriptor.name, record) {
                    Ok(child_context) => child_context,
                    Err(e) if e.is_record_local() => {
                        warn!(stream = %descriptor.name, "Skipping child streams: {e}");
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                for &child in &children {
                    if self.config.cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    self.run_stream(child, child_context.clone(), active, &mut *sink)
                        .await?;
                }
            }
            Ok(())
        }
        .boxed()
    }
}
