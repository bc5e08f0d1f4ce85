//! Input validation helpers
//!
//! Centralized text length constants and validation functions shared by the
//! services and the HTTP extractors.

use shared::address::is_valid_id;
use shared::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Person names, product references
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers, payment method tags
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Shipping addresses, notice bodies
pub const MAX_ADDRESS_LEN: usize = 500;

/// Chat message content
pub const MAX_MESSAGE_LEN: usize = 2000;

// `validator` length bounds are u64
pub const MAX_NAME_LEN_U64: u64 = MAX_NAME_LEN as u64;
pub const MAX_SHORT_TEXT_LEN_U64: u64 = MAX_SHORT_TEXT_LEN as u64;
pub const MAX_ADDRESS_LEN_U64: u64 = MAX_ADDRESS_LEN as u64;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a record id and return it normalized (trimmed, lowercase)
pub fn parse_id(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::required_field(field));
    }
    if !is_valid_id(trimmed) {
        return Err(
            AppError::with_message(ErrorCode::InvalidFormat, format!("{field} is not a valid id"))
                .with_detail("field", field),
        );
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required_field(field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a monetary amount: finite and not negative
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(
            AppError::validation(format!("{field} must be a non-negative number"))
                .with_detail("field", field),
        );
    }
    Ok(())
}
