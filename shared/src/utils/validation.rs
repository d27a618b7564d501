//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Maximum accepted email length
pub const EMAIL_MAX_LENGTH: usize = 255;
/// Password length bounds, in characters
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 128;
/// bcrypt only reads this many bytes of input
pub const PASSWORD_MAX_BYTES: usize = 72;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Validation error with field-level details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a collection holding a single error
    pub fn single(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        let mut errors = Self::new();
        errors.add_error(field, message, code);
        errors
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_error(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.add(ValidationError::new(field, message, code));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// One message per field, first error wins
    pub fn to_field_messages(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        for error in &self.errors {
            fields
                .entry(error.field.clone())
                .or_insert_with(|| error.message.clone());
        }
        fields
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Common validation functions
pub mod validators {
    use super::*;

    /// Check if a string's character count is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.chars().count();
        len >= min && len <= max
    }

    /// Check if an email address is well formed
    pub fn is_valid_email(email: &str) -> bool {
        email.len() <= EMAIL_MAX_LENGTH && EMAIL_REGEX.is_match(email)
    }

    /// Check that a password fits bcrypt's input without truncation
    pub fn fits_bcrypt(password: &str) -> bool {
        password.len() <= PASSWORD_MAX_BYTES
    }

    /// Check that a password has an upper-case letter, a lower-case letter and a digit
    pub fn has_password_complexity(password: &str) -> bool {
        let upper = password.chars().any(|c| c.is_uppercase());
        let lower = password.chars().any(|c| c.is_lowercase());
        let digit = password.chars().any(|c| c.is_ascii_digit());
        upper && lower && digit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validators::is_valid_email("test@x.com"));
        assert!(validators::is_valid_email("first.last+tag@sub.example.org"));
        assert!(!validators::is_valid_email("no-at-sign.com"));
        assert!(!validators::is_valid_email("a@b"));
        assert!(!validators::is_valid_email("a@b.c"));
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@x.com", "a".repeat(250));
        assert!(!validators::is_valid_email(&email));
    }

    #[test]
    fn test_password_complexity() {
        assert!(validators::has_password_complexity("Password123!"));
        assert!(!validators::has_password_complexity("alllowercase1"));
        assert!(!validators::has_password_complexity("NoDigitsHere"));
        assert!(!validators::has_password_complexity("ALLUPPER123"));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(validators::length_between("ääääääää", 8, 128));
        assert!(!validators::length_between("short", 8, 128));
    }

    #[test]
    fn test_bcrypt_limit_counts_bytes() {
        assert!(validators::fits_bcrypt(&"a".repeat(72)));
        assert!(!validators::fits_bcrypt(&"a".repeat(73)));
        // 40 characters, 80 bytes
        assert!(!validators::fits_bcrypt(&"ä".repeat(40)));
    }

    #[test]
    fn test_field_messages_keep_first() {
        let mut errors = ValidationErrors::new();
        errors.add_error("email", "first", "a");
        errors.add_error("email", "second", "b");
        errors.add_error("password", "weak", "c");
        let fields = errors.to_field_messages();
        assert_eq!(fields.get("email").map(String::as_str), Some("first"));
        assert_eq!(fields.len(), 2);
        assert_eq!(errors.to_string(), "email: first, email: second, password: weak");
    }
}
