use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHabitatCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHabitatResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteHabitatError {
    #[error("Habitat '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteHabitatResponse, DeleteHabitatError>> for DeleteHabitatCommand {}

impl crate::cqrs::middleware::Command for DeleteHabitatCommand {}

#[tracing::instrument(skip(pool), fields(habitat_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteHabitatCommand,
) -> Result<DeleteHabitatResponse, DeleteHabitatError> {
    let id = sqlx::query_scalar::<_, uuid::Uuid>("DELETE FROM habitats WHERE id = $1 RETURNING id")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(DeleteHabitatError::NotFound(command.id))?;

    tracing::info!("Habitat deleted");
    Ok(DeleteHabitatResponse { id, deleted: true })
}
