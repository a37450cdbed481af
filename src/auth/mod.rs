//! Authentication module
//!
//! Jira Cloud authenticates with HTTP Basic using the account email and an
//! API token.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
