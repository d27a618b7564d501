use actix_web::{web, HttpRequest, HttpResponse};

use st_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::RefreshTokenRequest;
use crate::handlers::error::handle_domain_error;

use super::{auth_response, presented_refresh_token, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new pair. The token is read from the JSON
/// body (`refresh_token`) or, when absent, from the `refresh-token` cookie.
/// The presented token is consumed either way.
///
/// ## Errors
/// - 401 `MISSING_REFRESH_TOKEN`: No token presented
/// - 401 `INVALID_REFRESH_TOKEN`: Unknown, expired or already used
pub async fn refresh<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    let token = presented_refresh_token(&req, body.map(web::Json::into_inner));

    match state.auth_service.refresh_token(&token).await {
        Ok(pair) => {
            let mut response = HttpResponse::Ok();
            state.cookies.set_tokens(&mut response, &pair);
            response.json(auth_response(pair, "Token refreshed successfully"))
        }
        Err(error) => handle_domain_error(&error),
    }
}
