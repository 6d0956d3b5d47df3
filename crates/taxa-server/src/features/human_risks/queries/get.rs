use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::human_risks::types::{HumanRisk, HUMAN_RISK_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHumanRiskQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetHumanRiskError {
    #[error("Human risk '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HumanRisk, GetHumanRiskError>> for GetHumanRiskQuery {}

impl crate::cqrs::middleware::Query for GetHumanRiskQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetHumanRiskQuery) -> Result<HumanRisk, GetHumanRiskError> {
    let sql = format!("SELECT {} FROM human_risks WHERE id = $1", HUMAN_RISK_COLUMNS);
    sqlx::query_as::<_, HumanRisk>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetHumanRiskError::NotFound(query.id))
}
