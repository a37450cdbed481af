//! Auth configuration types

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// HTTP Basic authentication (Jira Cloud: email + API token)
    Basic {
        /// Account email
        username: String,
        /// API token
        password: String,
    },
}

impl AuthConfig {
    /// Create basic auth config
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check if any credentials are attached
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
