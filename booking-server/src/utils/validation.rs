//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: customer, zone, table
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, payment proof references
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, zone code
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

/// Validate a monetary amount is not negative
pub fn validate_non_negative(
    value: rust_decimal::Decimal,
    field: &str,
) -> Result<(), AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}
