//! Transport abstraction
//!
//! The extraction engine only ever issues idempotent GET requests and sees
//! the raw status and body. Retrying transient failures is the transport's
//! business; deciding what a non-2xx status means is the stream's.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;

/// A single page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Absolute URL
    pub url: String,
    /// Query parameters, in the order they are sent
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl PageRequest {
    /// Create a request for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Look up the first value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A page response: HTTP status plus raw body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl PageResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a 200 response from a JSON value
    pub fn ok_json(body: &Value) -> Self {
        Self::new(200, body.to_string())
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }
}

/// The fetch capability used by streams
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request
    ///
    /// Transient failures are retried inside the transport. Statuses that
    /// are not retried are returned as a `PageResponse` so the caller can
    /// apply its own exception policy.
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse>;
}
