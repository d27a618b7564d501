//! Configuration for the token services

use chrono::Duration;
use st_shared::config::JwtConfig;

/// Upper bound for configured lifetimes, well inside chrono's range
const MAX_DURATION_DAYS: i64 = 365 * 100;

fn to_chrono(duration: std::time::Duration) -> Duration {
    Duration::from_std(duration)
        .unwrap_or_else(|_| Duration::days(MAX_DURATION_DAYS))
        .min(Duration::days(MAX_DURATION_DAYS))
}

/// Configuration shared by the token issuer and validator
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: String,
    /// Issuer written to and required in `iss`
    pub issuer: String,
    /// Audience written to and required in `aud`
    pub audience: String,
    /// Tolerance applied to `exp` and `nbf`
    pub clock_skew: Duration,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl TokenServiceConfig {
    pub fn from_jwt_config(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            clock_skew: to_chrono(config.clock_skew),
            access_token_ttl: to_chrono(config.access_token_ttl),
            refresh_token_ttl: to_chrono(config.refresh_token_ttl),
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self::from_jwt_config(config)
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("clock_skew", &self.clock_skew)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}
