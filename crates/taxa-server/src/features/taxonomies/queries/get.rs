use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::taxonomies::types::{Taxonomy, TAXONOMY_COLUMNS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaxonomyQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetTaxonomyError {
    #[error("Taxonomy '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Taxonomy, GetTaxonomyError>> for GetTaxonomyQuery {}

impl crate::cqrs::middleware::Query for GetTaxonomyQuery {}

/// Also used to populate species records.
pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Taxonomy>, sqlx::Error> {
    let sql = format!("SELECT {} FROM taxonomies WHERE id = $1", TAXONOMY_COLUMNS);
    sqlx::query_as::<_, Taxonomy>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetTaxonomyQuery) -> Result<Taxonomy, GetTaxonomyError> {
    fetch(&pool, query.id)
        .await?
        .ok_or(GetTaxonomyError::NotFound(query.id))
}
