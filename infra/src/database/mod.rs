//! Database module - MySQL implementations using SQLx
//!
//! This module provides the connection pool and the MySQL repository
//! implementations. Migrations are managed outside the service; the expected
//! tables are listed in [`mysql`].

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlRefreshTokenRepository, MySqlUserRepository};
