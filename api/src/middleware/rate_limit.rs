//! Rate limiting middleware for API endpoints
//!
//! Every request is charged to its client identity in the process-local
//! sliding-window limiter. Authentication paths use the strict limit, all other
//! paths the general one. A disabled limiter is a pass-through.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use st_core::errors::{AuthError, DomainError};
use st_core::services::{RateLimitPolicy, SlidingWindowRateLimiter};

use crate::handlers::error::handle_domain_error;
use crate::routes::rate_class_for;

/// Value of the `Retry-After` header on 429 responses
pub const RETRY_AFTER_SECS: u64 = 60;

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimit {
    limiter: Option<Arc<SlidingWindowRateLimiter>>,
    policy: RateLimitPolicy,
}

impl RateLimit {
    pub fn new(limiter: Arc<SlidingWindowRateLimiter>, policy: RateLimitPolicy) -> Self {
        Self {
            limiter: Some(limiter),
            policy,
        }
    }

    /// Admit everything without tracking
    pub fn disabled() -> Self {
        Self {
            limiter: None,
            policy: RateLimitPolicy::new(0, 0),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            policy: self.policy,
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Option<Arc<SlidingWindowRateLimiter>>,
    policy: RateLimitPolicy,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let Some(limiter) = self.limiter.as_ref() else {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        };

        let class = rate_class_for(req.path());
        let limit = self.policy.limit_for(class);
        let client_id = get_client_ip(&req);

        if limiter.is_allowed(&client_id, limit) {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        }

        log::warn!(
            "Rate limit exceeded: client={} method={} path={} limit={}",
            client_id,
            req.method(),
            req.path(),
            limit
        );
        let response =
            handle_domain_error(&DomainError::Auth(AuthError::RateLimitExceeded { limit }));
        Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
    }
}

/// Client identity: first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// peer address
pub fn get_client_ip(req: &ServiceRequest) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(',').next().unwrap_or_default().trim().to_string())
            .filter(|value| !value.is_empty())
    };

    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
