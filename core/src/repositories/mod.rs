//! Repository interfaces the core depends on.
//!
//! Concrete implementations live in the infrastructure crate.

pub mod token;
pub mod user;

pub use token::RefreshTokenRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use token::MockRefreshTokenRepository;
#[cfg(test)]
pub use user::MockUserRepository;
