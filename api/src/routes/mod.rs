//! Route table
//!
//! Every endpoint is declared once in [`ROUTES`]. Router registration and the
//! rate-limit middleware both read it, so the set of authentication paths
//! cannot drift between the two.

pub mod auth;
pub mod health;

use std::sync::Arc;

use actix_web::web;

use st_core::repositories::{RefreshTokenRepository, UserRepository};
use st_core::services::{RateClass, TokenValidator};

use crate::middleware::auth::JwtAuth;

/// Handler behind a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    Refresh,
    Logout,
    LogoutAll,
    Me,
    Health,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    Get,
    Post,
}

/// One row of the route table
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub method: RouteMethod,
    pub path: &'static str,
    pub endpoint: Endpoint,
    pub rate_class: RateClass,
    pub requires_auth: bool,
}

const fn route(
    method: RouteMethod,
    path: &'static str,
    endpoint: Endpoint,
    rate_class: RateClass,
    requires_auth: bool,
) -> RouteSpec {
    RouteSpec {
        method,
        path,
        endpoint,
        rate_class,
        requires_auth,
    }
}

pub const ROUTES: &[RouteSpec] = &[
    route(RouteMethod::Post, "/api/v1/auth/register", Endpoint::Register, RateClass::Auth, false),
    route(RouteMethod::Post, "/api/v1/auth/login", Endpoint::Login, RateClass::Auth, false),
    route(RouteMethod::Post, "/api/v1/auth/refresh", Endpoint::Refresh, RateClass::Auth, false),
    route(RouteMethod::Post, "/api/v1/auth/logout", Endpoint::Logout, RateClass::General, false),
    route(RouteMethod::Post, "/api/v1/auth/logout-all", Endpoint::LogoutAll, RateClass::General, true),
    route(RouteMethod::Get, "/api/v1/auth/me", Endpoint::Me, RateClass::General, true),
    route(RouteMethod::Get, "/health", Endpoint::Health, RateClass::General, false),
];

/// Limit class for a request path; exact match, anything unlisted is general
pub fn rate_class_for(path: &str) -> RateClass {
    ROUTES
        .iter()
        .find(|entry| entry.path == path)
        .map(|entry| entry.rate_class)
        .unwrap_or(RateClass::General)
}

/// Register every route of the table
pub fn configure<U, T>(cfg: &mut web::ServiceConfig, validator: Arc<TokenValidator>)
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    for entry in ROUTES {
        let route = match entry.method {
            RouteMethod::Get => web::get(),
            RouteMethod::Post => web::post(),
        };

        let route = match entry.endpoint {
            Endpoint::Register => route.to(auth::register::<U, T>),
            Endpoint::Login => route.to(auth::login::<U, T>),
            Endpoint::Refresh => route.to(auth::refresh::<U, T>),
            Endpoint::Logout => route.to(auth::logout::<U, T>),
            Endpoint::LogoutAll => route.to(auth::logout_all::<U, T>),
            Endpoint::Me => route.to(auth::me::<U, T>),
            Endpoint::Health => route.to(health::health),
        };

        if entry.requires_auth {
            cfg.route(entry.path, route.wrap(JwtAuth::new(validator.clone())));
        } else {
            cfg.route(entry.path, route);
        }
    }
}
