use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaxonomyCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTaxonomyResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteTaxonomyError {
    #[error("Taxonomy '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteTaxonomyResponse, DeleteTaxonomyError>> for DeleteTaxonomyCommand {}

impl crate::cqrs::middleware::Command for DeleteTaxonomyCommand {}

/// Delete a taxonomy. Species referencing it lose the reference and from
/// then on only show up in queries that keep unmatched species.
#[tracing::instrument(skip(pool), fields(taxonomy_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteTaxonomyCommand,
) -> Result<DeleteTaxonomyResponse, DeleteTaxonomyError> {
    let id = sqlx::query_scalar::<_, Uuid>("DELETE FROM taxonomies WHERE id = $1 RETURNING id")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(DeleteTaxonomyError::NotFound(command.id))?;

    tracing::info!("Taxonomy deleted");
    Ok(DeleteTaxonomyResponse { id, deleted: true })
}
