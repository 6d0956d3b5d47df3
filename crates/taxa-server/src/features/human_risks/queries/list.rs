use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::human_risks::types::{HumanRisk, HUMAN_RISK_COLUMNS};
use crate::features::shared::validation::{parse_id, FieldValidationError};
use crate::features::shared::{Paginated, PaginationParams};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListHumanRisksQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Only risks of this species
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListHumanRisksError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<HumanRisk>, ListHumanRisksError>> for ListHumanRisksQuery {}

impl crate::cqrs::middleware::Query for ListHumanRisksQuery {}

impl ListHumanRisksQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ListHumanRisksError> {
        PaginationParams::from_query(self.page, self.per_page).map_err(ListHumanRisksError::InvalidPagination)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListHumanRisksQuery,
) -> Result<Paginated<HumanRisk>, ListHumanRisksError> {
    let params = query.pagination()?;

    let species_id = query
        .species_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|id| parse_id(id, "species_id"))
        .transpose()?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM human_risks WHERE ($1::UUID IS NULL OR species_id = $1)",
    )
    .bind(species_id)
    .fetch_one(&pool)
    .await?;

    let sql = format!(
        "SELECT {} FROM human_risks
        WHERE ($1::UUID IS NULL OR species_id = $1)
        ORDER BY created_at, id
        LIMIT $2 OFFSET $3",
        HUMAN_RISK_COLUMNS
    );
    let items = sqlx::query_as::<_, HumanRisk>(&sql)
        .bind(species_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}
