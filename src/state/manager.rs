//! State manager implementation
//!
//! Provides file-based state persistence with atomic writes.

use super::types::{Advance, State};
use crate::context::Context;
use crate::error::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared handle on the bookmark document
///
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file, empty in memory mode
    path: PathBuf,
    state: Arc<RwLock<State>>,
}

impl StateManager {
    /// Create a state manager that checkpoints to `path`, starting empty
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(State::new())),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self::with_state(State::new())
    }

    /// Create an in-memory state manager seeded with a document
    pub fn with_state(state: State) -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            parse_state(&contents)?
        } else {
            State::new()
        };

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Create a state manager from inline JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::with_state(parse_state(json)?))
    }

    /// Stored replication value for a stream and context
    pub async fn bookmark(&self, stream: &str, context: &Context) -> Option<Value> {
        let state = self.state.read().await;
        state.bookmark(stream, context).cloned()
    }

    /// Offer a replication value; stored only when strictly greater
    pub async fn advance(
        &self,
        stream: &str,
        context: &Context,
        replication_key: &str,
        candidate: &Value,
    ) -> Advance {
        let mut state = self.state.write().await;
        state.advance(stream, context, replication_key, candidate)
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> State {
        self.state.read().await.clone()
    }

    /// Export state as JSON string
    pub async fn to_json(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Persist the full document atomically
    ///
    /// Writes a sibling temp file and renames it over the target. A no-op in
    /// memory mode.
    pub async fn checkpoint(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::Checkpoint {
                message: format!("Failed to write {}: {e}", temp_path.display()),
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::Checkpoint {
                message: format!("Failed to replace {}: {e}", self.path.display()),
            })?;

        debug!(path = %self.path.display(), "State checkpointed");
        Ok(())
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

fn parse_state(json: &str) -> Result<State> {
    if json.trim().is_empty() {
        return Ok(State::new());
    }
    serde_json::from_str(json).map_err(|e| Error::state(format!("Failed to parse state: {e}")))
}
