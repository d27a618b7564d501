use actix_web::{web, HttpResponse};
use validator::Validate;

use st_core::errors::DomainError;
use st_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::{to_validation_errors, LoginRequest};
use crate::handlers::error::handle_domain_error;

use super::{auth_response, AppState};

/// Handler for POST /api/v1/auth/login
///
/// Returns the token pair in the body and as HttpOnly cookies.
///
/// ## Errors
/// - 400 `VALIDATION_ERROR`: Malformed email or empty password
/// - 401 `INVALID_CREDENTIALS`: Unknown email or wrong password
pub async fn login<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_domain_error(&DomainError::from(to_validation_errors(&errors)));
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(pair) => {
            let mut response = HttpResponse::Ok();
            state.cookies.set_tokens(&mut response, &pair);
            response.json(auth_response(pair, "Login successful"))
        }
        Err(error) => handle_domain_error(&error),
    }
}
