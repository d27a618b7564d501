//! Domain layer containing entities shared by services and repositories.

pub mod entities;

pub use entities::{normalize_email, Claims, RefreshToken, TokenPair, User, TOKEN_TYPE};
