use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSpeciesCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSpeciesResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteSpeciesError {
    #[error("Species '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteSpeciesResponse, DeleteSpeciesError>> for DeleteSpeciesCommand {}

impl crate::cqrs::middleware::Command for DeleteSpeciesCommand {}

/// Delete a species together with its human risks.
#[tracing::instrument(skip(pool), fields(species_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteSpeciesCommand,
) -> Result<DeleteSpeciesResponse, DeleteSpeciesError> {
    let id = sqlx::query_scalar::<_, Uuid>("DELETE FROM species WHERE id = $1 RETURNING id")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(DeleteSpeciesError::NotFound(command.id))?;

    tracing::info!("Species deleted");
    Ok(DeleteSpeciesResponse { id, deleted: true })
}
