//! Authentication route handlers
//!
//! - Registration and login
//! - Refresh-token rotation
//! - Logout of one or every session
//! - The authenticated caller's identity

mod login;
mod logout;
mod me;
mod refresh;
mod register;

pub use login::login;
pub use logout::{logout, logout_all};
pub use me::me;
pub use refresh::refresh;
pub use register::register;

use std::sync::Arc;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};

use st_core::domain::{TokenPair, TOKEN_TYPE};
use st_core::repositories::{RefreshTokenRepository, UserRepository};
use st_core::services::AuthService;

use crate::dto::{AuthResponse, RefreshTokenRequest};

pub const ACCESS_TOKEN_COOKIE: &str = "access-token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh-token";

/// Cookie attributes shared by login, refresh and logout
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    /// Set the `Secure` attribute (production)
    pub secure: bool,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

/// Application state that holds shared services
pub struct AppState<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub auth_service: Arc<AuthService<U, T>>,
    pub cookies: CookieSettings,
}

impl CookieSettings {
    fn cookie(&self, name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(name, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(max_age_secs))
            .finish()
    }

    /// Attach both token cookies
    pub fn set_tokens(&self, response: &mut HttpResponseBuilder, pair: &TokenPair) {
        response.cookie(self.cookie(
            ACCESS_TOKEN_COOKIE,
            pair.access_token.clone(),
            self.access_token_ttl_secs,
        ));
        response.cookie(self.cookie(
            REFRESH_TOKEN_COOKIE,
            pair.refresh_token.clone(),
            self.refresh_token_ttl_secs,
        ));
    }

    /// Expire both token cookies
    pub fn clear_tokens(&self, response: &mut HttpResponseBuilder) {
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            let mut cookie = self.cookie(name, String::new(), 0);
            cookie.make_removal();
            response.cookie(cookie);
        }
    }
}

/// Refresh token from the JSON body, falling back to the cookie
fn presented_refresh_token(req: &HttpRequest, body: Option<RefreshTokenRequest>) -> String {
    body.and_then(|b| b.refresh_token)
        .filter(|token| !token.trim().is_empty())
        .or_else(|| req.cookie(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()))
        .unwrap_or_default()
}

fn auth_response(pair: TokenPair, message: &str) -> AuthResponse {
    AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: pair.expires_in,
        message: message.to_string(),
    }
}
