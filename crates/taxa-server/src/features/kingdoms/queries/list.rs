use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::pipeline::escape_like;
use crate::features::kingdoms::types::{Kingdom, KINGDOM_COLUMNS};
use crate::features::shared::{Paginated, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListKingdomsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Case-insensitive substring of the name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListKingdomsError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Kingdom>, ListKingdomsError>> for ListKingdomsQuery {}

impl crate::cqrs::middleware::Query for ListKingdomsQuery {}

impl ListKingdomsQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ListKingdomsError> {
        PaginationParams::from_query(self.page, self.per_page).map_err(ListKingdomsError::InvalidPagination)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListKingdomsQuery,
) -> Result<Paginated<Kingdom>, ListKingdomsError> {
    let params = query.pagination()?;
    let name_pattern = query
        .name_contains
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(escape_like);

    let total: i64 = sqlx::query_scalar(
        r"SELECT COUNT(*) FROM kingdoms WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\')",
    )
    .bind(name_pattern.as_deref())
    .fetch_one(&pool)
    .await?;

    let sql = format!(
        r"SELECT {} FROM kingdoms
        WHERE ($1::TEXT IS NULL OR name ILIKE $1 ESCAPE '\')
        ORDER BY name
        LIMIT $2 OFFSET $3",
        KINGDOM_COLUMNS
    );
    let items = sqlx::query_as::<_, Kingdom>(&sql)
        .bind(name_pattern.as_deref())
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
