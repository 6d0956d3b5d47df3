//! Server error type
//!
//! Feature commands and queries have their own error enums; each converts
//! into [`AppError`], which owns the mapping to HTTP status and error code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taxa_common::types::{CONSERVATION_STATUSES, RANK_NAMES};
use taxa_common::QueryError;
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::db::PipelineError;
use crate::features::shared::FieldValidationError;

/// Alias for Result with AppError
pub type ApiResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::Query(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Pipeline(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Query(err) => err.code(),
            AppError::Pipeline(_) | AppError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Pipeline(err) => {
                tracing::error!(error = %err, "Species query failed");
                "Error while querying species".to_string()
            },
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                "A database error occurred".to_string()
            },
            other => other.to_string(),
        };

        // Unknown labels come with the accepted ones
        let body = match &self {
            AppError::Query(QueryError::UnknownRank(_)) => {
                ErrorResponse::with_details(self.code(), message, json!({ "allowed": RANK_NAMES }))
            },
            AppError::Query(QueryError::UnknownStatus(_)) => ErrorResponse::with_details(
                self.code(),
                message,
                json!({ "allowed": CONSERVATION_STATUSES }),
            ),
            _ => ErrorResponse::new(self.code(), message),
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldValidationError> for AppError {
    fn from(err: FieldValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}
