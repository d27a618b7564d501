//! Access token validation

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;

use crate::domain::entities::token::Claims;
use crate::errors::TokenError;
use crate::services::clock::Clock;

use super::config::TokenServiceConfig;

/// Verifies and decodes access tokens into claims
///
/// Checks run in a fixed order and the first failure wins:
/// structure (header and payload both decode), algorithm and signature, `exp`, `nbf`, `iss`, `aud`.
/// Time checks use the injected clock with the configured skew on both sides.
pub struct TokenValidator {
    issuer: String,
    audience: String,
    clock_skew_secs: i64,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(config: &TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        // Signature only; every claim is checked below against our own clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            clock_skew_secs: config.clock_skew.num_seconds(),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            clock,
        }
    }

    /// Validate an access token and return its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Token is authentic and currently valid
    /// * `Err(TokenError)` - The first failed check, see the type docs for order
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        let result = self.check(token);
        if let Err(err) = &result {
            debug!(reason = err.reason(), "Access token rejected");
        }
        result
    }

    fn check(&self, token: &str) -> Result<Claims, TokenError> {
        let alg = header_algorithm(token)?;
        payload_claims(token)?;
        if alg != "HS256" {
            return Err(TokenError::InvalidSignature);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })?
            .claims;

        let now = self.clock.now().timestamp();
        if now > claims.exp.saturating_add(self.clock_skew_secs) {
            return Err(TokenError::TokenExpired);
        }
        if now < claims.nbf.saturating_sub(self.clock_skew_secs) {
            return Err(TokenError::TokenNotBefore);
        }
        if claims.iss != self.issuer {
            return Err(TokenError::InvalidIssuer);
        }
        if !claims.has_audience(&self.audience) {
            return Err(TokenError::InvalidAudience);
        }

        Ok(claims)
    }
}

/// Decode the payload segment into claims before any signature work
fn payload_claims(token: &str) -> Result<Claims, TokenError> {
    let payload = token.split('.').nth(1).ok_or(TokenError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}

/// Read `alg` from the token header without trusting anything else in it
fn header_algorithm(token: &str) -> Result<String, TokenError> {
    let mut parts = token.split('.');
    // An empty signature part is left for the signature check to reject.
    let (header, payload) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(_)) => (h, p),
        _ => return Err(TokenError::Malformed),
    };
    if parts.next().is_some() || header.is_empty() || payload.is_empty() {
        return Err(TokenError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    header
        .get("alg")
        .and_then(|alg| alg.as_str())
        .map(str::to_owned)
        .ok_or(TokenError::Malformed)
}
