use actix_web::{web, HttpResponse};
use validator::Validate;

use st_core::errors::DomainError;
use st_core::repositories::{RefreshTokenRepository, UserRepository};

use crate::dto::{to_validation_errors, RegisterRequest, RegisterResponse};
use crate::handlers::error::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "password": "Password123" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "message": "User registered successfully", "user_id": "…" }
/// ```
///
/// ## Errors
/// - 400 `VALIDATION_ERROR`: Field checks failed
/// - 400 `REGISTRATION_FAILED`: Registration rejected
pub async fn register<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<RegisterRequest>,
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
        .register(&request.email, &request.password)
        .await
    {
        Ok(user) => HttpResponse::Created().json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: user.id.to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
