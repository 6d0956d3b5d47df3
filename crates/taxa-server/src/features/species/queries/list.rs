use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::{Paginated, PaginationParams};
use crate::features::species::types::{Species, SPECIES_COLUMNS};

/// Plain paginated listing; the filtered views live in [`super::find`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSpeciesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListSpeciesError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Species>, ListSpeciesError>> for ListSpeciesQuery {}

impl crate::cqrs::middleware::Query for ListSpeciesQuery {}

impl ListSpeciesQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ListSpeciesError> {
        PaginationParams::from_query(self.page, self.per_page).map_err(ListSpeciesError::InvalidPagination)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListSpeciesQuery,
) -> Result<Paginated<Species>, ListSpeciesError> {
    let params = query.pagination()?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM species")
        .fetch_one(&pool)
        .await?;

    let sql = format!(
        "SELECT {} FROM species ORDER BY scientific_name LIMIT $1 OFFSET $2",
        SPECIES_COLUMNS
    );
    let items = sqlx::query_as::<_, Species>(&sql)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
