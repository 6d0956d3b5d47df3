use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHumanRiskCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHumanRiskResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteHumanRiskError {
    #[error("Human risk '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteHumanRiskResponse, DeleteHumanRiskError>> for DeleteHumanRiskCommand {}

impl crate::cqrs::middleware::Command for DeleteHumanRiskCommand {}

#[tracing::instrument(skip(pool), fields(human_risk_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteHumanRiskCommand,
) -> Result<DeleteHumanRiskResponse, DeleteHumanRiskError> {
    let id = sqlx::query_scalar::<_, Uuid>("DELETE FROM human_risks WHERE id = $1 RETURNING id")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(DeleteHumanRiskError::NotFound(command.id))?;

    tracing::info!("Human risk deleted");
    Ok(DeleteHumanRiskResponse { id, deleted: true })
}
