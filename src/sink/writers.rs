//! Sink implementations

use super::message::Message;
use crate::error::{Error, Result};
use crate::types::Record;
use async_trait::async_trait;
use std::io::Write;

/// Destination for sync messages
#[async_trait]
pub trait RecordSink: Send {
    /// Emit one message
    async fn emit(&mut self, message: Message) -> Result<()>;
}

/// Writes one JSON message per line to stdout
#[derive(Debug, Default)]
pub struct StdoutSink {
    pretty: bool,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-print messages (not line-delimited)
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

#[async_trait]
impl RecordSink for StdoutSink {
    async fn emit(&mut self, message: Message) -> Result<()> {
        let line = if self.pretty {
            serde_json::to_string_pretty(&message)?
        } else {
            serde_json::to_string(&message)?
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").map_err(|e| Error::output(format!("stdout: {e}")))?;
        if message.is_state() {
            stdout
                .flush()
                .map_err(|e| Error::output(format!("stdout: {e}")))?;
        }
        Ok(())
    }
}

/// Collects messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Vec<Message>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in emission order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Records emitted for a stream, in order
    pub fn records(&self, stream: &str) -> Vec<&Record> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Record {
                    stream: s, record, ..
                } if s == stream => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Number of record messages across all streams
    pub fn record_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_record()).count()
    }

    /// Streams that announced a schema, in order
    pub fn schema_streams(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::Schema { stream, .. } => Some(stream.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recent state message
    pub fn last_state(&self) -> Option<&crate::state::State> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::State { value } => Some(value),
            _ => None,
        })
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn emit(&mut self, message: Message) -> Result<()> {
        self.messages.push(message);
        Ok(())
    }
}
