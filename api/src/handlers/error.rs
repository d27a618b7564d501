//! Mapping of domain errors onto HTTP responses

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse,
};

use st_core::errors::{AuthError, DomainError, TokenError};
use st_shared::errors::IntoErrorResponse;
use st_shared::{error_codes, ErrorResponse};

use crate::middleware::rate_limit::RETRY_AFTER_SECS;

/// HTTP status for a domain error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Auth(AuthError::RegistrationFailed) => StatusCode::BAD_REQUEST,
        DomainError::Auth(AuthError::RateLimitExceeded { .. }) => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Auth(_)
        | DomainError::Credential(_)
        | DomainError::RefreshToken(_) => StatusCode::UNAUTHORIZED,
        DomainError::Token(TokenError::SigningFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
        DomainError::Internal { .. } | DomainError::Timeout { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Build the JSON error response for a domain error
///
/// Server-side failures are logged with their detail; the client only sees the
/// generic envelope.
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    let status = status_for(error);

    if status.is_server_error() {
        log::error!(
            "Request failed: {} (retryable: {})",
            error,
            error.is_retryable()
        );
    }

    let mut response = HttpResponse::build(status);
    if status == StatusCode::TOO_MANY_REQUESTS {
        response.insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS.to_string()));
    }
    response.json(error.to_error_response())
}

/// JSON extractor configuration turning body errors into `INVALID_REQUEST`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        log::debug!("Rejected request body: {}", err);
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(
            error_codes::INVALID_REQUEST,
            "Request body is not valid JSON",
        ));
        InternalError::from_response(err, response).into()
    })
}

/// JSON 404 for unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use st_core::errors::{CredentialError, RefreshTokenError, ValidationErrors};

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (
                ValidationErrors::single("email", "Invalid email format", "email").into(),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::RegistrationFailed.into(), StatusCode::BAD_REQUEST),
            (CredentialError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (TokenError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (TokenError::SigningFailed.into(), StatusCode::INTERNAL_SERVER_ERROR),
            (RefreshTokenError::InvalidRefreshToken.into(), StatusCode::UNAUTHORIZED),
            (AuthError::MissingRefreshToken.into(), StatusCode::UNAUTHORIZED),
            (AuthError::Unauthenticated.into(), StatusCode::UNAUTHORIZED),
            (
                AuthError::RateLimitExceeded { limit: 5 }.into(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (DomainError::timeout("store"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(status_for(&error), status, "{:?}", error);
        }
    }

    #[actix_web::test]
    async fn test_timeout_is_generic_500() {
        let response = handle_domain_error(&DomainError::timeout("refresh_token_store.delete"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("refresh_token_store"));
    }

    #[test]
    fn test_rate_limit_sets_retry_after() {
        let response = handle_domain_error(&AuthError::RateLimitExceeded { limit: 5 }.into());
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            RETRY_AFTER_SECS.to_string().as_str()
        );
    }
}
