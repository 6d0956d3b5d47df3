//! Error types for query translation

use thiserror::Error;

/// Result type alias for translator operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Reasons a set of request parameters cannot be turned into a query.
///
/// Every variant is a caller error: resubmitting corrected input fixes it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("At least one non-empty country is required")]
    EmptyCountryList,

    #[error("Unknown conservation status '{0}'. Must be one of: {statuses}", statuses = crate::types::conservation::CONSERVATION_STATUSES.join(", "))]
    UnknownStatus(String),

    #[error("Invalid status range: '{min}' is more severe than '{max}'")]
    InvertedRange { min: String, max: String },

    #[error("Invalid taxonomic level '{0}'. Must be one of: {levels}", levels = crate::types::rank::RANK_NAMES.join(", "))]
    UnknownRank(String),

    #[error("Invalid sort direction '{0}'. Must be 'asc' or 'desc'")]
    InvalidDirection(String),

    #[error("Limit must be a positive integer")]
    InvalidLimit,
}

impl QueryError {
    /// Machine-readable error code for API responses.
    ///
    /// Unknown ranks and statuses are reported distinctly from other bad
    /// requests; both responses list the accepted labels.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::UnknownRank(_) => "UNKNOWN_RANK",
            QueryError::UnknownStatus(_) => "UNKNOWN_STATUS",
            _ => "BAD_REQUEST",
        }
    }
}
