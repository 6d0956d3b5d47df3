use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteKingdomCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteKingdomResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteKingdomError {
    #[error("Kingdom '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteKingdomResponse, DeleteKingdomError>> for DeleteKingdomCommand {}

impl crate::cqrs::middleware::Command for DeleteKingdomCommand {}

/// Delete a kingdom. Species and taxonomies pointing at it keep existing
/// with the reference cleared.
#[tracing::instrument(skip(pool), fields(kingdom_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteKingdomCommand,
) -> Result<DeleteKingdomResponse, DeleteKingdomError> {
    let id = sqlx::query_scalar::<_, Uuid>("DELETE FROM kingdoms WHERE id = $1 RETURNING id")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(DeleteKingdomError::NotFound(command.id))?;

    tracing::info!("Kingdom deleted");
    Ok(DeleteKingdomResponse { id, deleted: true })
}
