//! Tests for token services

#[cfg(test)]
mod cleanup_tests;
#[cfg(test)]
mod validator_tests;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use st_shared::config::JwtConfig;

use crate::services::clock::ManualClock;

use super::TokenServiceConfig;

pub(crate) const SECRET: &str = "test-secret-key-that-is-long-enough-123";

pub(crate) fn start() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub(crate) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::from_jwt_config(&JwtConfig::new(SECRET))
}

pub(crate) fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start()))
}

/// Sign arbitrary claims with the test secret
pub(crate) fn sign_with(alg: Algorithm, claims: &serde_json::Value) -> String {
    encode(
        &Header::new(alg),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// Well-formed claims issued at `now`, valid for 15 minutes
pub(crate) fn claims_at(now: i64) -> serde_json::Value {
    serde_json::json!({
        "user_id": "6f1c2b1e-8f53-4e3c-9b1a-2f4d5e6a7b8c",
        "email": "test@x.com",
        "iss": "strive-api",
        "aud": ["strive-app"],
        "iat": now,
        "nbf": now,
        "exp": now + 900,
    })
}
