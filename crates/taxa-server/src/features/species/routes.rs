//! Species API routes
//!
//! CRUD:
//! - `POST /api/v1/species` - Create a species
//! - `GET /api/v1/species` - List species (`page`, `per_page`)
//! - `GET /api/v1/species/:id` - Get a species with kingdom, taxonomy and habitat
//! - `PUT /api/v1/species/:id` - Update a species
//! - `DELETE /api/v1/species/:id` - Delete a species and its human risks
//!
//! Views:
//! - `GET /api/v1/species/search` - `name`, `phylum`..`genus` substrings
//! - `GET /api/v1/species/exclude` - species whose taxonomy matches none of the ranks
//! - `GET /api/v1/species/country` - `country=Peru,Brazil`
//! - `GET /api/v1/species/status` - `status=vulnerable`
//! - `GET /api/v1/species/status-range` - `minStatus`, `maxStatus`
//! - `GET /api/v1/species/sorted-by-status` - `direction=asc|desc`, `limit`
//! - `GET /api/v1/species/most-endangered`
//! - `GET /api/v1/species/count-by-taxonomy` - `level`, `value`
//! - `GET /api/v1/species/simple` - names and status only
//! - `GET /api/v1/species/distribution` - names and countries only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use taxa_common::query::SpeciesQueryParams;

use super::commands::{
    CreateSpeciesCommand, CreateSpeciesError, DeleteSpeciesCommand, DeleteSpeciesError,
    UpdateSpeciesCommand, UpdateSpeciesError,
};
use super::queries::{
    CountByTaxonomyError, CountByTaxonomyQuery, FindSpeciesError, FindSpeciesQuery,
    GetSpeciesError, GetSpeciesQuery, ListSpeciesError, ListSpeciesQuery, SpeciesQueryKind,
};
use crate::api::response::ApiResponse;
use crate::cqrs::{execute_command, execute_query};
use crate::error::{ApiResult, AppError};
use crate::features::shared::parse_id;

pub fn species_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_species).get(list_species))
        .route("/search", get(search_species))
        .route("/exclude", get(exclude_species))
        .route("/country", get(species_by_country))
        .route("/status", get(species_by_status))
        .route("/status-range", get(species_by_status_range))
        .route("/sorted-by-status", get(species_sorted_by_status))
        .route("/most-endangered", get(most_endangered_species))
        .route("/count-by-taxonomy", get(count_by_taxonomy))
        .route("/simple", get(simple_species))
        .route("/distribution", get(species_distribution))
        .route(
            "/:id",
            get(get_species).put(update_species).delete(delete_species),
        )
}

/// Create a species
///
/// # Endpoint
///
/// `POST /api/v1/species`
///
/// # Request Body
///
/// ```json
/// {
///   "scientific_name": "Panthera leo",
///   "common_name": "Lion",
///   "conservation_status": "Vulnerable",
///   "geographic_distribution": { "countries": ["Kenya", "Tanzania"] },
///   "taxonomy_id": "7f1c..."
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - Species created, status stored in canonical casing
/// - `400 Bad Request` - Validation error, unknown status or dangling reference
/// - `409 Conflict` - Scientific name already exists
#[tracing::instrument(skip(pool, command), fields(scientific_name = %command.scientific_name))]
async fn create_species(
    State(pool): State<PgPool>,
    Json(command): Json<CreateSpeciesCommand>,
) -> ApiResult<Response> {
    let species = execute_command(command, |c| super::commands::create::handle(pool, c)).await?;
    Ok(ApiResponse::success(species).with_status(StatusCode::CREATED))
}

#[tracing::instrument(skip(pool, query))]
async fn list_species(
    State(pool): State<PgPool>,
    Query(query): Query<ListSpeciesQuery>,
) -> ApiResult<Response> {
    let page = execute_query(query, |q| super::queries::list::handle(pool, q)).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn get_species(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let query = GetSpeciesQuery { id: parse_id(&id, "id")? };
    let species = execute_query(query, |q| super::queries::get::handle(pool, q)).await?;
    Ok(ApiResponse::success(species).with_status(StatusCode::OK))
}

/// Update a species; omitted fields keep their value
///
/// # Endpoint
///
/// `PUT /api/v1/species/:id`
///
/// # Response
///
/// - `200 OK` - Updated species
/// - `400 Bad Request` - Empty body, validation error or unknown status
/// - `404 Not Found` - Species not found
#[tracing::instrument(skip(pool, command))]
async fn update_species(
    State(pool): State<PgPool>,
    Path(id): Path<String>,
    Json(mut command): Json<UpdateSpeciesCommand>,
) -> ApiResult<Response> {
    command.id = parse_id(&id, "id")?;
    let species = execute_command(command, |c| super::commands::update::handle(pool, c)).await?;
    Ok(ApiResponse::success(species).with_status(StatusCode::OK))
}

#[tracing::instrument(skip(pool))]
async fn delete_species(State(pool): State<PgPool>, Path(id): Path<String>) -> ApiResult<Response> {
    let command = DeleteSpeciesCommand { id: parse_id(&id, "id")? };
    let response = execute_command(command, |c| super::commands::delete::handle(pool, c)).await?;
    Ok(ApiResponse::success(response).with_status(StatusCode::OK))
}

// ============================================================================
// Species Views
// ============================================================================

async fn find(pool: PgPool, kind: SpeciesQueryKind, params: SpeciesQueryParams) -> ApiResult<Response> {
    let query = FindSpeciesQuery { kind, params };
    let documents = execute_query(query, |q| super::queries::find::handle(pool, q)).await?;
    let meta = json!({ "count": documents.len() });
    Ok(ApiResponse::success_with_meta(documents, meta).with_status(StatusCode::OK))
}

/// Species whose scientific name and taxonomy ranks contain the given text
///
/// # Endpoint
///
/// `GET /api/v1/species/search?name=panthera&family=felidae`
///
/// # Response
///
/// - `200 OK` - Matching species; those without a taxonomy only match a
///   name-only search
#[tracing::instrument(skip(pool))]
async fn search_species(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::Search, params).await
}

/// Species whose taxonomy matches none of the given ranks
///
/// # Endpoint
///
/// `GET /api/v1/species/exclude?class=mammalia`
///
/// # Response
///
/// - `200 OK` - Remaining species, unclassified ones included
#[tracing::instrument(skip(pool))]
async fn exclude_species(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::Exclude, params).await
}

/// Species found in any of the listed countries
///
/// # Endpoint
///
/// `GET /api/v1/species/country?country=Peru,Brazil`
///
/// # Response
///
/// - `200 OK` - Matching species
/// - `400 Bad Request` - `country` missing or blank
#[tracing::instrument(skip(pool))]
async fn species_by_country(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::Country, params).await
}

/// Species with exactly one conservation status
///
/// # Endpoint
///
/// `GET /api/v1/species/status?status=vulnerable`
///
/// # Response
///
/// - `200 OK` - Matching species
/// - `400 Bad Request` - `UNKNOWN_STATUS`, with the accepted labels in
///   `error.details.allowed`
#[tracing::instrument(skip(pool))]
async fn species_by_status(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::Status, params).await
}

/// Species whose status lies between two statuses, both inclusive
///
/// # Endpoint
///
/// `GET /api/v1/species/status-range?minStatus=vulnerable&maxStatus=extinto`
///
/// # Response
///
/// - `200 OK` - Matching species
/// - `400 Bad Request` - Missing bound, unknown status, or `minStatus` more
///   severe than `maxStatus`
#[tracing::instrument(skip(pool))]
async fn species_by_status_range(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::StatusRange, params).await
}

/// Species ordered by severity
///
/// # Endpoint
///
/// `GET /api/v1/species/sorted-by-status?direction=desc&limit=10`
///
/// Unknown statuses sort after every known one ascending and before them
/// descending.
///
/// # Response
///
/// - `200 OK` - Sorted species
/// - `400 Bad Request` - Bad `direction` or non-positive `limit`
#[tracing::instrument(skip(pool))]
async fn species_sorted_by_status(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::SortedByStatus, params).await
}

/// The single most severely threatened species with a known status
///
/// # Endpoint
///
/// `GET /api/v1/species/most-endangered`
#[tracing::instrument(skip(pool))]
async fn most_endangered_species(State(pool): State<PgPool>) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::MostEndangered, SpeciesQueryParams::default()).await
}

/// Names and status of every species
///
/// # Endpoint
///
/// `GET /api/v1/species/simple`
#[tracing::instrument(skip(pool))]
async fn simple_species(State(pool): State<PgPool>) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::Simple, SpeciesQueryParams::default()).await
}

/// Names and countries of every species
///
/// # Endpoint
///
/// `GET /api/v1/species/distribution`
#[tracing::instrument(skip(pool))]
async fn species_distribution(State(pool): State<PgPool>) -> ApiResult<Response> {
    find(pool, SpeciesQueryKind::Distribution, SpeciesQueryParams::default()).await
}

/// Species counts per value of one taxonomic rank
///
/// # Endpoint
///
/// `GET /api/v1/species/count-by-taxonomy?level=class&value=mamm`
///
/// # Response
///
/// - `200 OK` - `[{ "key": "Mammalia", "count": 2 }]` with `meta.level`;
///   unclassified species are counted under `null`
/// - `400 Bad Request` - `UNKNOWN_RANK`, with the accepted ranks in
///   `error.details.allowed`
#[tracing::instrument(skip(pool))]
async fn count_by_taxonomy(
    State(pool): State<PgPool>,
    Query(params): Query<SpeciesQueryParams>,
) -> ApiResult<Response> {
    let query = CountByTaxonomyQuery { params };
    let counts =
        execute_query(query, |q| super::queries::count_by_taxonomy::handle(pool, q)).await?;
    let meta = json!({ "level": counts.level });
    Ok(ApiResponse::success_with_meta(counts.groups, meta).with_status(StatusCode::OK))
}

// ============================================================================
// Error Mapping
// ============================================================================

impl From<CreateSpeciesError> for AppError {
    fn from(err: CreateSpeciesError) -> Self {
        match err {
            CreateSpeciesError::Validation(e) => AppError::Validation(e.to_string()),
            CreateSpeciesError::Status(e) => AppError::Query(e),
            CreateSpeciesError::DuplicateScientificName(_) => AppError::Conflict(err.to_string()),
            CreateSpeciesError::UnknownReference(_) => AppError::BadRequest(err.to_string()),
            CreateSpeciesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateSpeciesError> for AppError {
    fn from(err: UpdateSpeciesError) -> Self {
        match err {
            UpdateSpeciesError::NoFieldsToUpdate => AppError::Validation(err.to_string()),
            UpdateSpeciesError::Validation(e) => AppError::Validation(e.to_string()),
            UpdateSpeciesError::Status(e) => AppError::Query(e),
            UpdateSpeciesError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateSpeciesError::DuplicateScientificName(_) => AppError::Conflict(err.to_string()),
            UpdateSpeciesError::UnknownReference(_) => AppError::BadRequest(err.to_string()),
            UpdateSpeciesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteSpeciesError> for AppError {
    fn from(err: DeleteSpeciesError) -> Self {
        match err {
            DeleteSpeciesError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteSpeciesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetSpeciesError> for AppError {
    fn from(err: GetSpeciesError) -> Self {
        match err {
            GetSpeciesError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetSpeciesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListSpeciesError> for AppError {
    fn from(err: ListSpeciesError) -> Self {
        match err {
            ListSpeciesError::InvalidPagination(msg) => AppError::Validation(msg.to_string()),
            ListSpeciesError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<FindSpeciesError> for AppError {
    fn from(err: FindSpeciesError) -> Self {
        match err {
            FindSpeciesError::Query(e) => AppError::Query(e),
            FindSpeciesError::Pipeline(e) => AppError::Pipeline(e),
        }
    }
}

impl From<CountByTaxonomyError> for AppError {
    fn from(err: CountByTaxonomyError) -> Self {
        match err {
            CountByTaxonomyError::Query(e) => AppError::Query(e),
            CountByTaxonomyError::Pipeline(e) => AppError::Pipeline(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::PipelineError;
    use taxa_common::QueryError;

    #[test]
    fn test_translator_errors_are_client_errors() {
        let err = AppError::from(FindSpeciesError::Query(QueryError::EmptyCountryList));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(CountByTaxonomyError::Query(QueryError::UnknownRank(
            "kingdom".to_string(),
        )));
        assert_eq!(err.code(), "UNKNOWN_RANK");
    }

    #[test]
    fn test_pipeline_errors_are_server_errors() {
        let err = AppError::from(FindSpeciesError::Pipeline(PipelineError::InvalidQuery(
            "bad".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_duplicate_species_is_conflict() {
        let err = AppError::from(CreateSpeciesError::DuplicateScientificName(
            "Panthera leo".to_string(),
        ));
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
