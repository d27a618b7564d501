//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Token type reported to clients alongside an access token
pub const TOKEN_TYPE: &str = "Bearer";

/// Claims structure for the access token payload
///
/// `aud` is always written as an array; a single string is accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID as a string UUID
    pub user_id: String,

    /// Normalized email of the user
    pub email: String,

    /// Issuer
    pub iss: String,

    /// Audience
    #[serde(deserialize_with = "one_or_many")]
    pub aud: Vec<String>,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Not before (Unix seconds)
    pub nbf: i64,

    /// Expiration (Unix seconds)
    pub exp: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(aud) => aud,
    })
}

impl Claims {
    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.user_id)
    }

    /// Whether `audience` is among the token's audiences
    pub fn has_audience(&self, audience: &str) -> bool {
        self.aud.iter().any(|a| a == audience)
    }
}

/// Refresh token row as persisted by the store
///
/// Only the SHA-256 digest of the opaque value is kept; the raw value is held
/// by the client alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// Hex SHA-256 of the opaque token value
    pub token_hash: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token was last updated
    pub updated_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Creates a new refresh token row expiring `ttl` after `now`
    pub fn new(user_id: Uuid, token_hash: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    /// A row is expired from its `expires_at` instant onward
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token (64 hex characters)
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}
