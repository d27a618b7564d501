//! In-memory repositories
//!
//! Process-local stores behind `tokio::sync::RwLock`. Data does not survive a
//! restart; used by the `memory` storage backend and by integration tests.

mod token_repository;
mod user_repository;

#[cfg(test)]
mod tests;

pub use token_repository::InMemoryRefreshTokenRepository;
pub use user_repository::InMemoryUserRepository;
