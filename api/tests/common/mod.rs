//! Shared setup for the HTTP tests: the real app factory over in-memory stores

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::{http::header, test};
use serde_json::{json, Value};

use st_api::app::AppServices;
use st_core::services::{ManualClock, OsRandom};
use st_infra::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
use st_shared::{AppConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig};

pub const SECRET: &str = "integration-test-secret-of-32-chars!";
pub const PASSWORD: &str = "Password123";

pub type Services = AppServices<InMemoryUserRepository, InMemoryRefreshTokenRepository>;

pub struct TestApp {
    pub services: Services,
    pub clock: Arc<ManualClock>,
    pub tokens: Arc<InMemoryRefreshTokenRepository>,
}

pub fn config(rate_limit: RateLimitConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.auth.jwt = JwtConfig::new(SECRET);
    config.auth.password.bcrypt_cost = 4;
    config.auth.login.failure_delay = Duration::ZERO;
    config.rate_limit = rate_limit;
    config
}

pub fn build(config: AppConfig) -> TestApp {
    let clock = Arc::new(ManualClock::default());
    let users = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(InMemoryRefreshTokenRepository::new(clock.clone()));
    let services = AppServices::build(
        &config,
        users,
        tokens.clone(),
        clock.clone(),
        Arc::new(OsRandom),
    );
    TestApp {
        services,
        clock,
        tokens,
    }
}

/// App without rate limiting
pub fn setup() -> TestApp {
    build(config(RateLimitConfig::disabled()))
}

pub fn production() -> TestApp {
    let mut config = config(RateLimitConfig::disabled());
    config.environment = Environment::Production;
    build(config)
}

pub fn register_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "email": email, "password": password }))
}

pub fn login_request(email: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

pub fn refresh_request(refresh_token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn error_code<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let body: Value = test::read_body_json(resp).await;
    body["error"]["code"].as_str().unwrap_or_default().to_string()
}
