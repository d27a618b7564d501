//! Human-friendly duration parsing for configuration values
//!
//! Accepts `500ms`, `90s`, `2m`, `1h`, `7d` and bare integers (seconds).

use std::time::Duration;
use thiserror::Error;

/// Error returned when a duration string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration: {input:?}")]
pub struct DurationParseError {
    pub input: String,
}

/// Parse a duration such as `2m` or `500ms`
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    let err = || DurationParseError {
        input: input.to_string(),
    };

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    if digits.is_empty() {
        return Err(err());
    }
    let value: u64 = digits.parse().map_err(|_| err())?;

    let duration = match unit.trim() {
        "" | "s" => Duration::from_secs(value),
        "ms" => Duration::from_millis(value),
        "m" => Duration::from_secs(value.checked_mul(60).ok_or_else(err)?),
        "h" => Duration::from_secs(value.checked_mul(3600).ok_or_else(err)?),
        "d" => Duration::from_secs(value.checked_mul(86_400).ok_or_else(err)?),
        _ => return Err(err()),
    };

    Ok(duration)
}
