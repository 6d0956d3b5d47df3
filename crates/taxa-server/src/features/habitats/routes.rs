//! Habitat API routes
//!
//! - `POST /api/v1/habitats` - Create a habitat
//! - `GET /api/v1/habitats` - List habitats (`page`, `per_page`, `climate`)
//! - `GET /api/v1/habitats/:id` - Get a habitat
//! - `PUT /api/v1/habitats/:id` - Update a habitat
//! - `DELETE /api/v1/habitats/:id` - Delete a habitat

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
    CreateHabitatCommand, CreateHabitatError, DeleteHabitatCommand, DeleteHabitatError,
    UpdateHabitatCommand, UpdateHabitatError,
};
use super::queries::{GetHabitatError, GetHabitatQuery, ListHabitatsError, ListHabitatsQuery};
use crate::api::response::ApiResponse;
use crate::cqrs::{execute_command, execute_query};
use crate::error::{ApiResult, AppError};
use crate::features::shared::parse_id;

pub fn habitats_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_habitat).get(list_habitats))
        .route(
            "/:id",
            get(get_habitat).put(update_habitat).delete(delete_habitat),
        )
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
async fn create_habitat(
    State(pool): State<PgPool>,
    Json(command): Json<CreateHabitatCommand>,
) -> ApiResult<Response> {
    let habitat = execute_command(command, |c| super::commands::create::handle(pool, c)).await?;
    Ok(ApiResponse::success(habitat).with_status(StatusCode::CREATED))
}

#[tracing::instrument(skip(pool, query))]
async fn list_habitats(
    State(pool): State<PgPool>,
    Query(query): Query<ListHabitatsQuery>,
) -> ApiResult<Response> {
    let page = execute_query(query, |q| super::queries::list::handle(pool, q)).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn get_habitat(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let query = GetHabitatQuery { id: parse_id(&id, "id")? };
    let habitat = execute_query(query, |q| super::queries::get::handle(pool, q)).await?;
    Ok(ApiResponse::success(habitat).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool, command))]
async fn update_habitat(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(mut command): Json<UpdateHabitatCommand>,
) -> ApiResult<Response> {
    command.id = parse_id(&id, "id")?;
    let habitat = execute_command(command, |c| super::commands::update::handle(pool, c)).await?;
    Ok(ApiResponse::success(habitat).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn delete_habitat(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let command = DeleteHabitatCommand { id: parse_id(&id, "id")? };
    let response = execute_command(command, |c| super::commands::delete::handle(pool, c)).await?;
    Ok(ApiResponse::success(response).with_status(StatusCode::OK))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateHabitatError> for AppError {
    fn from(err: CreateHabitatError) -> Self {
        match err {
            CreateHabitatError::Validation(e) => AppError::Validation(e.to_string()),
            CreateHabitatError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateHabitatError> for AppError {
    fn from(err: UpdateHabitatError) -> Self {
        match err {
            UpdateHabitatError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
            UpdateHabitatError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateHabitatError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateHabitatError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteHabitatError> for AppError {
    fn from(err: DeleteHabitatError) -> Self {
        match err {
            DeleteHabitatError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteHabitatError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetHabitatError> for AppError {
    fn from(err: GetHabitatError) -> Self {
        match err {
            GetHabitatError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetHabitatError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListHabitatsError> for AppError {
    fn from(err: ListHabitatsError) -> Self {
        match err {
            ListHabitatsError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListHabitatsError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_mapping() {
        let err = AppError::from(GetHabitatError::NotFound(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = AppError::from(DeleteHabitatError::NotFound(Uuid::nil()));
        assert!(err.to_string().contains(&Uuid::nil().to_string()));

        let err = AppError::from(UpdateHabitatError::NoFieldsToUpdate);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
