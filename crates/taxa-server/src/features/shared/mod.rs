//! Shared utilities and types for feature modules
//!
//! - **pagination**: list query parameters and response metadata
//! - **validation**: input checks shared by commands
//! - **error_helpers**: unique and foreign-key violation classification

pub mod error_helpers;
pub mod pagination;
pub mod validation;

pub use error_helpers::{
    constraint_violation, is_foreign_key_violation, is_unique_violation, ConstraintViolation,
};
pub use pagination::{Paginated, PaginationMetadata, PaginationParams};
pub use validation::{
    canonical_status, normalize_countries, parse_id, validate_optional_text, validate_text,
    FieldValidationError,
};
