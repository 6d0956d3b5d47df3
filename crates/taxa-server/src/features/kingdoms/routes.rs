//! Kingdom API routes
//!
//! - `POST /api/v1/kingdoms` - Create a kingdom
//! - `GET /api/v1/kingdoms` - List kingdoms (`page`, `per_page`, `name_contains`)
//! - `GET /api/v1/kingdoms/:id` - Get a kingdom
//! - `PUT /api/v1/kingdoms/:id` - Update a kingdom
//! - `DELETE /api/v1/kingdoms/:id` - Delete a kingdom

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::commands::{
    CreateKingdomCommand, CreateKingdomError, DeleteKingdomCommand, DeleteKingdomError,
    UpdateKingdomCommand, UpdateKingdomError,
};
use super::queries::{GetKingdomError, GetKingdomQuery, ListKingdomsError, ListKingdomsQuery};
use crate::api::response::ApiResponse;
use crate::cqrs::{execute_command, execute_query};
use crate::error::{ApiResult, AppError};
use crate::features::shared::parse_id;

pub fn kingdoms_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_kingdom).get(list_kingdoms))
        .route(
            "/:id",
            get(get_kingdom).put(update_kingdom).delete(delete_kingdom),
        )
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
async fn create_kingdom(
    State(pool): State<PgPool>,
    Json(command): Json<CreateKingdomCommand>,
) -> ApiResult<Response> {
    let kingdom = execute_command(command, |c| super::commands::create::handle(pool, c)).await?;
    Ok(ApiResponse::success(kingdom).with_status(StatusCode::CREATED))
}

#[tracing::instrument(skip(pool, query))]
async fn list_kingdoms(
    State(pool): State<PgPool>,
    Query(query): Query<ListKingdomsQuery>,
) -> ApiResult<Response> {
    let page = execute_query(query, |q| super::queries::list::handle(pool, q)).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn get_kingdom(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let query = GetKingdomQuery { id: parse_id(&id, "id")? };
    let kingdom = execute_query(query, |q| super::queries::get::handle(pool, q)).await?;
    Ok(ApiResponse::success(kingdom).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool, command))]
async fn update_kingdom(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(mut command): Json<UpdateKingdomCommand>,
) -> ApiResult<Response> {
    command.id = parse_id(&id, "id")?;
    let kingdom = execute_command(command, |c| super::commands::update::handle(pool, c)).await?;
    Ok(ApiResponse::success(kingdom).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn delete_kingdom(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let command = DeleteKingdomCommand { id: parse_id(&id, "id")? };
    let response = execute_command(command, |c| super::commands::delete::handle(pool, c)).await?;
    Ok(ApiResponse::success(response).with_status(StatusCode::OK))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateKingdomError> for AppError {
    fn from(err: CreateKingdomError) -> Self {
        match err {
            CreateKingdomError::Validation(e) => AppError::Validation(e.to_string()),
            CreateKingdomError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            CreateKingdomError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateKingdomError> for AppError {
    fn from(err: UpdateKingdomError) -> Self {
        match err {
            UpdateKingdomError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
            UpdateKingdomError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateKingdomError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateKingdomError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            UpdateKingdomError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteKingdomError> for AppError {
    fn from(err: DeleteKingdomError) -> Self {
        match err {
            DeleteKingdomError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteKingdomError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetKingdomError> for AppError {
    fn from(err: GetKingdomError) -> Self {
        match err {
            GetKingdomError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetKingdomError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListKingdomsError> for AppError {
    fn from(err: ListKingdomsError) -> Self {
        match err {
            ListKingdomsError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListKingdomsError::Database(e) => AppError::Database(e),
        }
    }
}
