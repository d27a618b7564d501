use actix_web::{web, HttpRequest, HttpResponse};

use st_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::{LogoutAllResponse, MessageResponse, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::{presented_refresh_token, AppState};

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented refresh token, if any, and clears both cookies.
/// Succeeds for unknown or missing tokens.
pub async fn logout<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    let token = presented_refresh_token(&req, body.map(web::Json::into_inner));

    match state.auth_service.logout(&token).await {
        Ok(()) => {
            let mut response = HttpResponse::Ok();
            state.cookies.clear_tokens(&mut response);
            response.json(MessageResponse {
                message: "Logout successful".to_string(),
            })
        }
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/v1/auth/logout-all
///
/// Requires `Authorization: Bearer {access_token}`. Revokes every refresh
/// token of the caller. Access tokens already issued stay valid until they
/// expire.
pub async fn logout_all<U, T>(
    state: web::Data<AppState<U, T>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    match state.auth_service.logout_all(auth.user_id).await {
        Ok(revoked) => {
            let mut response = HttpResponse::Ok();
            state.cookies.clear_tokens(&mut response);
            response.json(LogoutAllResponse {
                message: "Logged out from all sessions".to_string(),
                revoked_sessions: revoked,
            })
        }
        Err(error) => handle_domain_error(&error),
    }
}
