//! Domain-specific error types for authentication and related operations
//!
//! Several kinds deliberately collapse distinct causes into one variant
//! (`CredentialError`, `RefreshTokenError`) so callers cannot learn whether an
//! account exists or why a refresh token was refused.

use thiserror::Error;

/// Credential verification failure
///
/// "No such user" and "wrong password" are the same error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Access token failures, in the order validation checks them
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotBefore,

    #[error("Invalid issuer")]
    InvalidIssuer,

    #[error("Invalid audience")]
    InvalidAudience,

    #[error("Token signing failed")]
    SigningFailed,
}

impl TokenError {
    /// Short snake_case reason used in log events
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::TokenExpired => "token_expired",
            TokenError::TokenNotBefore => "token_not_before",
            TokenError::InvalidIssuer => "invalid_issuer",
            TokenError::InvalidAudience => "invalid_audience",
            TokenError::SigningFailed => "signing_failed",
        }
    }
}

/// Refresh token failure
///
/// Unknown, expired, already-rotated and orphaned tokens all surface as this.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

/// Authentication flow errors not covered by the kinds above
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Registration failed")]
    RegistrationFailed,

    #[error("Rate limit exceeded: {limit} requests per minute")]
    RateLimitExceeded { limit: u32 },

    #[error("Refresh token is required")]
    MissingRefreshToken,

    #[error("Authentication required")]
    Unauthenticated,
}
