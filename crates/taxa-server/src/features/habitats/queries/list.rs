use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::pipeline::escape_like;
use crate::features::habitats::types::{Habitat, HABITAT_COLUMNS};
use crate::features::shared::{Paginated, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListHabitatsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Case-insensitive substring of the climate label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListHabitatsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Habitat>, ListHabitatsError>> for ListHabitatsQuery {}

impl crate::cqrs::middleware::Query for ListHabitatsQuery {}

impl ListHabitatsQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ListHabitatsError> {
        PaginationParams::from_query(self.page, self.per_page).map_err(ListHabitatsError::InvalidPagination)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListHabitatsQuery,
) -> Result<Paginated<Habitat>, ListHabitatsError> {
    let params = query.pagination()?;

    let climate = query
        .climate
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(escape_like);

    let total: i64 = sqlx::query_scalar(
        r"SELECT COUNT(*) FROM habitats WHERE ($1::TEXT IS NULL OR climate ILIKE $1 ESCAPE '\')",
    )
    .bind(climate.as_deref())
    .fetch_one(&pool)
    .await?;

    let sql = format!(
        r"SELECT {} FROM habitats
        WHERE ($1::TEXT IS NULL OR climate ILIKE $1 ESCAPE '\')
        ORDER BY name, id
        LIMIT $2 OFFSET $3",
        HABITAT_COLUMNS
    );
    let items = sqlx::query_as::<_, Habitat>(&sql)
        .bind(climate.as_deref())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
