//! Access and refresh token minting

use std::sync::Arc;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sha2::{Digest, Sha256};
use tracing::error;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::TokenError;
use crate::services::clock::Clock;
use crate::services::random::RandomSource;

use super::config::TokenServiceConfig;

/// Random bytes in an opaque refresh token (hex-encoded to 64 characters)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Hex SHA-256 of an opaque refresh token, the form stores index it by
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Mints signed access tokens and opaque refresh tokens
pub struct TokenIssuer {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl TokenIssuer {
    /// Creates a new token issuer
    ///
    /// # Arguments
    ///
    /// * `config` - Signing secret, issuer, audience and lifetimes
    /// * `clock` - Time source for `iat`, `nbf` and `exp`
    /// * `random` - CSPRNG for refresh token values
    pub fn new(
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            config,
            encoding_key,
            clock,
            random,
        }
    }

    /// Build and sign an access token for `user`
    ///
    /// Claims are `iat = nbf = now` and `exp = now + access_token_ttl`.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact JWT signed with HS256
    /// * `Err(TokenError::SigningFailed)` - Encoding failed
    pub fn issue_access_token(&self, user: &User) -> Result<String, TokenError> {
        let now = self.clock.now();
        let claims = Claims {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            iss: self.config.issuer.clone(),
            aud: vec![self.config.audience.clone()],
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + self.config.access_token_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to sign access token");
            TokenError::SigningFailed
        })
    }

    /// Generate a new opaque refresh token: 32 random bytes as 64 lowercase hex characters
    pub fn issue_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        self.random.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Issue a fresh pair for `user` along with the row to persist for it
    pub fn issue_pair(&self, user: &User) -> Result<(TokenPair, RefreshToken), TokenError> {
        let access_token = self.issue_access_token(user)?;
        let refresh_token = self.issue_refresh_token();
        let row = RefreshToken::new(
            user.id,
            hash_refresh_token(&refresh_token),
            self.clock.now(),
            self.config.refresh_token_ttl,
        );
        let pair = TokenPair::new(access_token, refresh_token, self.access_token_ttl_secs());
        Ok((pair, row))
    }

    /// Access token lifetime in whole seconds
    pub fn access_token_ttl_secs(&self) -> i64 {
        self.config.access_token_ttl.num_seconds()
    }

    /// Refresh token lifetime in whole seconds
    pub fn refresh_token_ttl_secs(&self) -> i64 {
        self.config.refresh_token_ttl.num_seconds()
    }
}
