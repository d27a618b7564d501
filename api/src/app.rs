//! Application state and factory
//!
//! [`AppServices`] wires configuration, stores, clock and CSPRNG into the core
//! services once; [`create_app`] builds an actix-web `App` from it, once per
//! worker.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App};

use st_core::repositories::{RefreshTokenRepository, UserRepository};
use st_core::services::{
    AuthService, AuthServiceConfig, Clock, CredentialVerifier, RandomSource, RateLimitPolicy,
    SlidingWindowRateLimiter, TokenIssuer, TokenServiceConfig, TokenValidator,
};
use st_shared::AppConfig;

use crate::handlers::error::{json_config, not_found};
use crate::middleware::rate_limit::RateLimit;
use crate::routes::{self, auth::AppState, auth::CookieSettings};

/// Everything the HTTP layer needs, built once at start-up
pub struct AppServices<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    pub state: web::Data<AppState<U, T>>,
    pub validator: Arc<TokenValidator>,
    pub rate_limit: RateLimit,
    /// Present when rate limiting is enabled
    pub limiter: Option<Arc<SlidingWindowRateLimiter>>,
}

impl<U, T> Clone for AppServices<U, T>
where
    U: UserRepository,
    T: RefreshTokenRepository,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            validator: self.validator.clone(),
            rate_limit: self.rate_limit.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

impl<U, T> AppServices<U, T>
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    pub fn build(
        config: &AppConfig,
        users: Arc<U>,
        tokens: Arc<T>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        let token_config = TokenServiceConfig::from_jwt_config(&config.auth.jwt);
        let validator = Arc::new(TokenValidator::new(&token_config, clock.clone()));
        let issuer = Arc::new(TokenIssuer::new(token_config, clock.clone(), random.clone()));
        let credentials = Arc::new(CredentialVerifier::new(&config.auth.password, random));

        let cookies = CookieSettings {
            secure: config.environment.is_production(),
            access_token_ttl_secs: issuer.access_token_ttl_secs(),
            refresh_token_ttl_secs: issuer.refresh_token_ttl_secs(),
        };

        let auth_service = Arc::new(AuthService::new(
            users,
            tokens,
            credentials,
            issuer,
            clock.clone(),
            AuthServiceConfig::from(&config.auth),
        ));

        let (rate_limit, limiter) = if config.rate_limit.enabled {
            let limiter = Arc::new(SlidingWindowRateLimiter::new(clock));
            let policy = RateLimitPolicy::new(
                config.rate_limit.auth_per_minute,
                config.rate_limit.general_per_minute,
            );
            (RateLimit::new(limiter.clone(), policy), Some(limiter))
        } else {
            (RateLimit::disabled(), None)
        };

        Self {
            state: web::Data::new(AppState {
                auth_service,
                cookies,
            }),
            validator,
            rate_limit,
            limiter,
        }
    }
}

/// Create and configure the application
pub fn create_app<U, T>(
    services: &AppServices<U, T>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    let validator = services.validator.clone();

    App::new()
        .app_data(services.state.clone())
        .app_data(json_config())
        // Logger outermost so rate-limited requests are logged too
        .wrap(services.rate_limit.clone())
        .wrap(Logger::default())
        .configure(|cfg| routes::configure::<U, T>(cfg, validator))
        .default_service(web::route().to(not_found))
}
