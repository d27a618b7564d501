//! MySQL-specific database implementations
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE users (
//!     id            CHAR(36)     NOT NULL PRIMARY KEY,
//!     email         VARCHAR(255) NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     created_at    DATETIME(6)  NOT NULL,
//!     updated_at    DATETIME(6)  NOT NULL
//! );
//!
//! CREATE TABLE refresh_tokens (
//!     id         CHAR(36)    NOT NULL PRIMARY KEY,
//!     user_id    CHAR(36)    NOT NULL,
//!     token_hash CHAR(64)    NOT NULL UNIQUE,
//!     expires_at DATETIME(6) NOT NULL,
//!     created_at DATETIME(6) NOT NULL,
//!     updated_at DATETIME(6) NOT NULL,
//!     INDEX idx_refresh_tokens_user (user_id),
//!     INDEX idx_refresh_tokens_expiry (expires_at)
//! );
//! ```

pub mod token_repository_impl;
pub mod user_repository_impl;

// Re-export the MySQL implementations
pub use token_repository_impl::MySqlRefreshTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use st_core::errors::DomainError;

/// Wrap a driver error as an internal domain error
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "{}", context);
    DomainError::internal(format!("{}: {}", context, e))
}

/// Parse a UUID stored as CHAR(36)
pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<uuid::Uuid, DomainError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| DomainError::internal(format!("Invalid UUID in {}: {}", column, e)))
}
