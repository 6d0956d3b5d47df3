//! Human risk API routes
//!
//! - `POST /api/v1/human-risks` - Create a risk for a species
//! - `GET /api/v1/human-risks` - List risks (`page`, `per_page`, `species_id`)
//! - `GET /api/v1/human-risks/:id` - Get a risk
//! - `PUT /api/v1/human-risks/:id` - Update a risk
//! - `DELETE /api/v1/human-risks/:id` - Delete a risk

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
    CreateHumanRiskCommand, CreateHumanRiskError, DeleteHumanRiskCommand, DeleteHumanRiskError,
    UpdateHumanRiskCommand, UpdateHumanRiskError,
};
use super::queries::{
    GetHumanRiskError, GetHumanRiskQuery, ListHumanRisksError, ListHumanRisksQuery,
};
use crate::api::response::ApiResponse;
use crate::cqrs::{execute_command, execute_query};
use crate::error::{ApiResult, AppError};
use crate::features::shared::parse_id;

pub fn human_risks_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_human_risk).get(list_human_risks))
        .route(
            "/:id",
            get(get_human_risk).put(update_human_risk).delete(delete_human_risk),
        )
}

#[tracing::instrument(skip(pool, command))]
async fn create_human_risk(
    State(pool): State<PgPool>,
    Json(command): Json<CreateHumanRiskCommand>,
) -> ApiResult<Response> {
    let risk = execute_command(command, |c| super::commands::create::handle(pool, c)).await?;
    Ok(ApiResponse::success(risk).with_status(StatusCode::CREATED))
}

#[tracing::instrument(skip(pool, query))]
async fn list_human_risks(
    State(pool): State<PgPool>,
    Query(query): Query<ListHumanRisksQuery>,
) -> ApiResult<Response> {
    let page = execute_query(query, |q| super::queries::list::handle(pool, q)).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn get_human_risk(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let query = GetHumanRiskQuery { id: parse_id(&id, "id")? };
    let risk = execute_query(query, |q| super::queries::get::handle(pool, q)).await?;
    Ok(ApiResponse::success(risk).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool, command))]
async fn update_human_risk(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(mut command): Json<UpdateHumanRiskCommand>,
) -> ApiResult<Response> {
    command.id = parse_id(&id, "id")?;
    let risk = execute_command(command, |c| super::commands::update::handle(pool, c)).await?;
    Ok(ApiResponse::success(risk).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn delete_human_risk(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let command = DeleteHumanRiskCommand { id: parse_id(&id, "id")? };
    let response = execute_command(command, |c| super::commands::delete::handle(pool, c)).await?;
    Ok(ApiResponse::success(response).with_status(StatusCode::OK))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateHumanRiskError> for AppError {
    fn from(err: CreateHumanRiskError) -> Self {
        match err {
            CreateHumanRiskError::Validation(e) => AppError::Validation(e.to_string()),
            CreateHumanRiskError::UnknownSpecies(_) => AppError::BadRequest(err.to_string()),
            CreateHumanRiskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateHumanRiskError> for AppError {
    fn from(err: UpdateHumanRiskError) -> Self {
        match err {
            UpdateHumanRiskError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
            UpdateHumanRiskError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateHumanRiskError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateHumanRiskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteHumanRiskError> for AppError {
    fn from(err: DeleteHumanRiskError) -> Self {
        match err {
            DeleteHumanRiskError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteHumanRiskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetHumanRiskError> for AppError {
    fn from(err: GetHumanRiskError) -> Self {
        match err {
            GetHumanRiskError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetHumanRiskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListHumanRisksError> for AppError {
    fn from(err: ListHumanRisksError) -> Self {
        match err {
            ListHumanRisksError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListHumanRisksError::Validation(e) => AppError::Validation(e.to_string()),
            ListHumanRisksError::Database(e) => AppError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_unknown_species_is_a_client_error() {
        let err = AppError::from(CreateHumanRiskError::UnknownSpecies(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "BAD_REQUEST");

        let err = AppError::from(UpdateHumanRiskError::NotFound(Uuid::nil()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
