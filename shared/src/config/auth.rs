//! Authentication and authorization configuration

use std::fmt;
use std::time::Duration;

/// Minimum accepted length of the HMAC signing secret
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT authentication configuration
#[derive(Clone, PartialEq, Eq)]
pub struct JwtConfig {
    /// HMAC-SHA256 signing secret
    pub secret: String,

    /// Value of the `iss` claim, matched exactly on validation
    pub issuer: String,

    /// Audience this service issues for and accepts
    pub audience: String,

    /// Symmetric tolerance applied to `exp` and `nbf`
    pub clock_skew: Duration,

    /// Access token lifetime
    pub access_token_ttl: Duration,

    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: String::from("strive-api"),
            audience: String::from("strive-app"),
            clock_skew: Duration::from_secs(120),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

// The secret never appears in logs or panic messages.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("clock_skew", &self.clock_skew)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    /// Check the secret is long enough to sign with
    pub fn has_strong_secret(&self) -> bool {
        self.secret.chars().count() >= MIN_SECRET_LENGTH
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    /// bcrypt cost factor (4..=31)
    pub bcrypt_cost: u32,

    /// Maximum concurrent hash/verify operations
    pub hash_concurrency: usize,

    /// Upper bound for a single hash/verify, including queueing
    pub hash_timeout: Duration,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            hash_concurrency: 4,
            hash_timeout: Duration::from_secs(5),
        }
    }
}

/// Login behaviour configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginConfig {
    /// Fixed delay applied before every failed login response
    pub failure_delay: Duration,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            failure_delay: Duration::from_millis(500),
        }
    }
}

/// Authentication configuration combining all auth-related configs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Password hashing configuration
    pub password: PasswordConfig,

    /// Login configuration
    pub login: LoginConfig,

    /// Per-operation timeout for user and refresh token stores
    pub store_timeout: Duration,

    /// How often expired refresh tokens are purged
    pub refresh_token_sweep_interval: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            password: PasswordConfig::default(),
            login: LoginConfig::default(),
            store_timeout: Duration::from_secs(3),
            refresh_token_sweep_interval: Duration::from_secs(3600),
        }
    }
}
