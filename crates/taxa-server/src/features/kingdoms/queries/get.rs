use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::kingdoms::types::{Kingdom, KINGDOM_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetKingdomQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetKingdomError {
    #[error("Kingdom '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Kingdom, GetKingdomError>> for GetKingdomQuery {}

impl crate::cqrs::middleware::Query for GetKingdomQuery {}

/// Fetch one kingdom by id; also used to populate species records.
pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Kingdom>, sqlx::Error> {
    let sql = format!("SELECT {} FROM kingdoms WHERE id = $1", KINGDOM_COLUMNS);
    sqlx::query_as::<_, Kingdom>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetKingdomQuery) -> Result<Kingdom, GetKingdomError> {
    fetch(&pool, query.id)
        .await?
        .ok_or(GetKingdomError::NotFound(query.id))
}
