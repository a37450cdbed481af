//! HTTP transport module
//!
//! Provides the `Transport` seam the extraction engine talks to, and the
//! reqwest-backed `HttpClient` that implements it with retry, rate
//! limiting, and backoff.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connection errors
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Credentials applied to every request

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{PageRequest, PageResponse, Transport};

#[cfg(test)]
pub(crate) mod scripted;
