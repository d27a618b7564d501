//! # Strive Core
//!
//! Core business logic and domain layer for the Strive backend.
//! This crate contains domain entities, the authentication services
//! (credentials, tokens, rate limiting, account flows), repository
//! interfaces, and the error types that cross every layer.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{normalize_email, Claims, RefreshToken, TokenPair, User, TOKEN_TYPE};
pub use errors::{
    AuthError, CredentialError, DomainError, DomainResult, RefreshTokenError, TokenError,
};
pub use repositories::{RefreshTokenRepository, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, Clock, CredentialVerifier, OsRandom, RandomSource, RateClass,
    RateLimitPolicy, RefreshTokenSweeper, SlidingWindowRateLimiter, SystemClock, TokenIssuer,
    TokenServiceConfig, TokenValidator,
};
