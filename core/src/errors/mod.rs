//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{AuthError, CredentialError, RefreshTokenError, TokenError};
pub use st_shared::validation::{ValidationError, ValidationErrors};

use st_shared::errors::IntoErrorResponse;
use st_shared::{error_codes, ErrorResponse};
use thiserror::Error;

/// Core domain errors crossing every service boundary
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    RefreshToken(#[from] RefreshTokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },
}

impl DomainError {
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        DomainError::Timeout {
            operation: operation.into(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Timeout { .. })
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => error_codes::VALIDATION_ERROR,
            DomainError::Credential(CredentialError::InvalidCredentials) => {
                error_codes::INVALID_CREDENTIALS
            }
            DomainError::Token(err) => match err {
                TokenError::Malformed => error_codes::MALFORMED_TOKEN,
                TokenError::InvalidSignature => error_codes::INVALID_SIGNATURE,
                TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
                TokenError::TokenNotBefore => error_codes::TOKEN_NOT_VALID_YET,
                TokenError::InvalidIssuer => error_codes::INVALID_ISSUER,
                TokenError::InvalidAudience => error_codes::INVALID_AUDIENCE,
                TokenError::SigningFailed => error_codes::INTERNAL_ERROR,
            },
            DomainError::RefreshToken(RefreshTokenError::InvalidRefreshToken) => {
                error_codes::INVALID_REFRESH_TOKEN
            }
            DomainError::Auth(err) => match err {
                AuthError::RegistrationFailed => error_codes::REGISTRATION_FAILED,
                AuthError::RateLimitExceeded { .. } => error_codes::RATE_LIMIT_EXCEEDED,
                AuthError::MissingRefreshToken => error_codes::MISSING_REFRESH_TOKEN,
                AuthError::Unauthenticated => error_codes::UNAUTHORIZED,
            },
            DomainError::Internal { .. } | DomainError::Timeout { .. } => {
                error_codes::INTERNAL_ERROR
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Client-facing message for errors whose detail stays in the logs
const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Validation(errors) => {
                let details = errors
                    .to_field_messages()
                    .into_iter()
                    .map(|(field, message)| (field, serde_json::Value::String(message)))
                    .collect();
                ErrorResponse::with_details(self.code(), "Validation failed", details)
            }
            DomainError::Token(TokenError::SigningFailed)
            | DomainError::Internal { .. }
            | DomainError::Timeout { .. } => ErrorResponse::new(self.code(), INTERNAL_MESSAGE),
            _ => ErrorResponse::new(self.code(), self.to_string()),
        }
    }
}
