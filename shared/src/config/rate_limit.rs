//! Rate limiting configuration module

use std::time::Duration;

/// Rate limiting configuration
///
/// Two classes exist: the strict `auth` class for login, register and refresh,
/// and the `general` class for every other route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Requests per minute for authentication endpoints
    pub auth_per_minute: u32,

    /// Requests per minute for all other endpoints
    pub general_per_minute: u32,

    /// How often empty client buckets are swept
    pub sweep_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_minute: 5,
            general_per_minute: 60,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Configuration with limiting switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Set both per-minute limits
    pub fn with_limits(mut self, auth_per_minute: u32, general_per_minute: u32) -> Self {
        self.auth_per_minute = auth_per_minute;
        self.general_per_minute = general_per_minute;
        self
    }
}
