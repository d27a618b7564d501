//! Authentication service module
//!
//! This module composes credentials and tokens into the account flows:
//! - Registration with normalized, unique emails
//! - Login with a uniform failure response and delay
//! - Single-use refresh token rotation
//! - Logout of one session or every session of a user

mod config;
mod delay_response;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use delay_response::DelayResponseService;
pub use service::AuthService;
