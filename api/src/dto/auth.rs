//! Request and response bodies for the authentication endpoints

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use st_shared::validation::{
    validators, ValidationErrors, EMAIL_MAX_LENGTH, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
};

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(failure("required", "Email is required"));
    }
    if email.chars().count() > EMAIL_MAX_LENGTH {
        return Err(failure("length", "Email must be at most 255 characters"));
    }
    if !validators::is_valid_email(email.trim()) {
        return Err(failure("email", "Invalid email format"));
    }
    Ok(())
}

fn validate_new_password(password: &str) -> Result<(), ValidationError> {
    if !validators::length_between(password, PASSWORD_MIN_LENGTH, PASSWORD_MAX_LENGTH) {
        return Err(failure(
            "length",
            "Password must be between 8 and 128 characters",
        ));
    }
    if !validators::fits_bcrypt(password) {
        return Err(failure("length", "Password must be at most 72 bytes"));
    }
    if !validators::has_password_complexity(password) {
        return Err(failure(
            "complexity",
            "Password must contain an uppercase letter, a lowercase letter and a digit",
        ));
    }
    Ok(())
}

/// Convert derive-validator output into the shared field error list
pub fn to_validation_errors(errors: &validator::ValidationErrors) -> ValidationErrors {
    let mut converted = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            converted.add_error(field.to_string(), message, error.code.to_string());
        }
    }
    converted
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_new_password"))]
    pub password: String,
}

/// Login checks format only; stored passwords predating the strength policy
/// must still authenticate.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of refresh and logout; the token may come from the cookie instead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutAllResponse {
    pub message: String,
    pub revoked_sessions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub active_sessions: usize,
}
