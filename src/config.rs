//! Tap configuration
//!
//! The JSON document passed with `--config` / `--config-json`:
//!
//! ```json
//! {
//!   "username": "me@example.com",
//!   "api_key": "...",
//!   "domain": "example.atlassian.net",
//!   "start_date": "2024-01-01T00:00:00Z",
//!   "custom_fields": {"customfield_10016": "story_points"}
//! }
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::state::parse_timestamp;
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Account email used for Basic auth
    #[serde(default)]
    pub username: String,

    /// API token used as the Basic auth password
    #[serde(default)]
    pub api_key: String,

    /// Instance host (e.g. `example.atlassian.net`), or a full origin URL
    #[serde(default)]
    pub domain: String,

    /// Earliest `updated` value requested when no bookmark exists
    #[serde(default)]
    pub start_date: Option<String>,

    /// Custom field id to name mapping
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,

    /// User agent header override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Records requested per page (`maxResults`)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_page_size() -> u32 {
    100
}

impl TapConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Check required fields and value formats
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("username", &self.username),
            ("api_key", &self.api_key),
            ("domain", &self.domain),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        if self.page_size == 0 {
            return Err(Error::invalid_value(
                "page_size",
                "must be greater than zero",
            ));
        }

        if let Some(start_date) = self.start_date() {
            if parse_timestamp(&start_date).is_none() {
                return Err(Error::invalid_value(
                    "start_date",
                    format!("'{start_date}' is not a date or RFC 3339 timestamp"),
                ));
            }
        }

        self.origin()?;
        Ok(())
    }

    /// Non-empty start date
    pub fn start_date(&self) -> Option<String> {
        self.start_date.clone().none_if_empty()
    }

    /// Instance origin, `https://{domain}` unless a scheme is given
    pub fn origin(&self) -> Result<Url> {
        let domain = self.domain.trim().trim_end_matches('/');
        let raw = if domain.contains("://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
        Url::parse(&raw).map_err(|e| Error::invalid_value("domain", e.to_string()))
    }

    /// Basic auth with username and API token
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::basic(&self.username, &self.api_key)
    }

    /// HTTP client settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );

        builder = match self.http.requests_per_second {
            0 => builder.no_rate_limit(),
            rps => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
        };

        if let Some(agent) = self.user_agent.clone().none_if_empty() {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("start_date", &self.start_date)
            .field("custom_fields", &self.custom_fields)
            .field("user_agent", &self.user_agent)
            .field("page_size", &self.page_size)
            .field("http", &self.http)
            .finish()
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for 429, 5xx, timeouts and connection errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Steady request rate; 0 disables rate limiting
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    #[serde(default)]
    pub backoff: BackoffType,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_second: default_rps(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_rps() -> u32 {
    10
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    60000
}
