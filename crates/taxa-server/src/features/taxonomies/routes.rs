//! Taxonomy API routes
//!
//! - `POST /api/v1/taxonomies` - Create a taxonomy
//! - `GET /api/v1/taxonomies` - List taxonomies (`page`, `per_page`, `kingdom_id`)
//! - `GET /api/v1/taxonomies/:id` - Get a taxonomy
//! - `PUT /api/v1/taxonomies/:id` - Update a taxonomy
//! - `DELETE /api/v1/taxonomies/:id` - Delete a taxonomy

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
    CreateTaxonomyCommand, CreateTaxonomyError, DeleteTaxonomyCommand, DeleteTaxonomyError,
    UpdateTaxonomyCommand, UpdateTaxonomyError,
};
use super::queries::{
    GetTaxonomyError, GetTaxonomyQuery, ListTaxonomiesError, ListTaxonomiesQuery,
};
use crate::api::response::ApiResponse;
use crate::cqrs::{execute_command, execute_query};
use crate::error::{ApiResult, AppError};
use crate::features::shared::parse_id;

pub fn taxonomies_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_taxonomy).get(list_taxonomies))
        .route(
            "/:id",
            get(get_taxonomy).put(update_taxonomy).delete(delete_taxonomy),
        )
}

#[tracing::instrument(skip(pool, command))]
async fn create_taxonomy(
    State(pool): State<PgPool>,
    Json(command): Json<CreateTaxonomyCommand>,
) -> ApiResult<Response> {
    let taxonomy = execute_command(command, |c| super::commands::create::handle(pool, c)).await?;
    Ok(ApiResponse::success(taxonomy).with_status(StatusCode::CREATED))
}

#[tracing::instrument(skip(pool, query))]
async fn list_taxonomies(
    State(pool): State<PgPool>,
    Query(query): Query<ListTaxonomiesQuery>,
) -> ApiResult<Response> {
    let page = execute_query(query, |q| super::queries::list::handle(pool, q)).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn get_taxonomy(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let query = GetTaxonomyQuery { id: parse_id(&id, "id")? };
    let taxonomy = execute_query(query, |q| super::queries::get::handle(pool, q)).await?;
    Ok(ApiResponse::success(taxonomy).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool, command))]
async fn update_taxonomy(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(mut command): Json<UpdateTaxonomyCommand>,
) -> ApiResult<Response> {
    command.id = parse_id(&id, "id")?;
    let taxonomy = execute_command(command, |c| super::commands::update::handle(pool, c)).await?;
    Ok(ApiResponse::success(taxonomy).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn delete_taxonomy(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let command = DeleteTaxonomyCommand { id: parse_id(&id, "id")? };
    let response = execute_command(command, |c| super::commands::delete::handle(pool, c)).await?;
    Ok(ApiResponse::success(response).with_status(StatusCode::OK))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateTaxonomyError> for AppError {
    fn from(err: CreateTaxonomyError) -> Self {
        match err {
            CreateTaxonomyError::NoRanks => AppError::Validation(err.to_string()),
            CreateTaxonomyError::Validation(e) => AppError::Validation(e.to_string()),
            CreateTaxonomyError::UnknownKingdom(_) => AppError::BadRequest(err.to_string()),
            CreateTaxonomyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateTaxonomyError> for AppError {
    fn from(err: UpdateTaxonomyError) -> Self {
        match err {
            UpdateTaxonomyError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
            UpdateTaxonomyError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateTaxonomyError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateTaxonomyError::UnknownKingdom(_) => AppError::BadRequest(err.to_string()),
            UpdateTaxonomyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteTaxonomyError> for AppError {
    fn from(err: DeleteTaxonomyError) -> Self {
        match err {
            DeleteTaxonomyError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteTaxonomyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetTaxonomyError> for AppError {
    fn from(err: GetTaxonomyError) -> Self {
        match err {
            GetTaxonomyError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetTaxonomyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListTaxonomiesError> for AppError {
    fn from(err: ListTaxonomiesError) -> Self {
        match err {
            ListTaxonomiesError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListTaxonomiesError::Validation(e) => AppError::Validation(e.to_string()),
            ListTaxonomiesError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_unknown_kingdom_is_a_client_error() {
        let err = AppError::from(CreateTaxonomyError::UnknownKingdom(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "BAD_REQUEST");

        let err = AppError::from(UpdateTaxonomyError::NotFound(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
