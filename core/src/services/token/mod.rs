//! Token service module for access and refresh tokens
//!
//! This module handles all token-related operations including:
//! - Signing HS256 access tokens and minting opaque refresh tokens
//! - Validating access tokens with ordered, skew-tolerant claim checks
//! - Background purging of expired refresh tokens

mod cleanup;
mod config;
mod issuer;
mod validator;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, RefreshTokenSweeper};
pub use config::TokenServiceConfig;
pub use issuer::{hash_refresh_token, TokenIssuer, REFRESH_TOKEN_BYTES};
pub use validator::TokenValidator;
