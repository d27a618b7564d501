//! Configuration for the authentication service

use std::time::Duration;

use st_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthServiceConfig {
    /// Fixed delay before any failed login response
    pub login_failure_delay: Duration,
    /// Upper bound for each user or refresh token store call
    pub store_timeout: Duration,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            login_failure_delay: Duration::from_millis(500),
            store_timeout: Duration::from_secs(3),
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            login_failure_delay: config.login.failure_delay,
            store_timeout: config.store_timeout,
        }
    }
}
