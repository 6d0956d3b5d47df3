//! Shared validation utilities
//!
//! Commands call these before touching the database so that malformed input
//! is rejected with a 400 and never reaches SQL.

use taxa_common::{ConservationStatus, QueryError};
use thiserror::Error;
use uuid::Uuid;

/// Longest accepted free-text field, in characters.
pub const MAX_TEXT_LENGTH: usize = 256;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Errors that can occur during field validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("Invalid {field} '{value}': must be a UUID")]
    InvalidId { field: &'static str, value: String },
}

/// Validate a required text field
pub fn validate_text(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    if value.trim().is_empty() {
        return Err(FieldValidationError::Required { field });
    }

    if value.chars().count() > max_length {
        return Err(FieldValidationError::TooLong { field, max_length });
    }

    Ok(())
}

/// Validate an optional text field; `None` always passes.
pub fn validate_optional_text(
    value: Option<&str>,
    field: &'static str,
    max_length: usize,
) -> Result<(), FieldValidationError> {
    match value {
        Some(value) => validate_text(value, field, max_length),
        None => Ok(()),
    }
}

/// Parse a path or body identifier.
pub fn parse_id(value: &str, field: &'static str) -> Result<Uuid, FieldValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| FieldValidationError::InvalidId {
        field,
        value: value.to_string(),
    })
}

/// Canonical label for a conservation status given in any casing.
pub fn canonical_status(value: &str) -> Result<&'static str, QueryError> {
    value
        .parse::<ConservationStatus>()
        .map(ConservationStatus::label)
}

/// Trimmed, non-empty, de-duplicated country names in first-seen order.
pub fn normalize_countries(countries: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(countries.len());
    for country in countries {
        let country = country.trim();
        if !country.is_empty() && !normalized.iter().any(|c| c == country) {
            normalized.push(country.to_string());
        }
    }
    normalized
}
