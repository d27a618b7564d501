//! # Infrastructure Layer
//!
//! Concrete persistence for the Strive backend: the MySQL repositories behind
//! the `mysql` feature, the connection pool they share, and process-local
//! in-memory repositories for development and tests.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-memory repositories
pub mod memory;

pub use memory::{InMemoryRefreshTokenRepository, InMemoryUserRepository};

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlRefreshTokenRepository, MySqlUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
