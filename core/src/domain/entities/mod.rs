//! Domain entities for the Strive authentication core.

pub mod token;
pub mod user;

pub use token::{Claims, RefreshToken, TokenPair, TOKEN_TYPE};
pub use user::{normalize_email, User};
