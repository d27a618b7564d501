//! Shared utilities and common types for the Strive server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered configuration loader
//! - The JSON error envelope returned by every endpoint
//! - Field validation helpers and duration parsing

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    LoginConfig, PasswordConfig, RateLimitConfig, ServerConfig, StorageBackend,
};
pub use errors::{error_codes, ErrorBody, ErrorResponse};
pub use utils::{duration, validation};
