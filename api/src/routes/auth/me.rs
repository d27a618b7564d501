use actix_web::{web, HttpResponse};

use st_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::MeResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/me
pub async fn me<U, T>(state: web::Data<AppState<U, T>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    match state.auth_service.sessions(auth.user_id).await {
        Ok(sessions) => HttpResponse::Ok().json(MeResponse {
            user_id: auth.user_id.to_string(),
            email: auth.email,
            active_sessions: sessions.len(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
