use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::habitats::types::{Habitat, HABITAT_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHabitatQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetHabitatError {
    #[error("Habitat '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Habitat, GetHabitatError>> for GetHabitatQuery {}

impl crate::cqrs::middleware::Query for GetHabitatQuery {}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Habitat>, sqlx::Error> {
    let sql = format!("SELECT {} FROM habitats WHERE id = $1", HABITAT_COLUMNS);
    sqlx::query_as::<_, Habitat>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetHabitatQuery) -> Result<Habitat, GetHabitatError> {
    fetch(&pool, query.id)
        .await?
        .ok_or(GetHabitatError::NotFound(query.id))
}
