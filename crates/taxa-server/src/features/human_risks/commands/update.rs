use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::human_risks::types::{HumanRisk, HUMAN_RISK_COLUMNS};
use crate::features::shared::validation::{
    validate_optional_text, FieldValidationError, MAX_DESCRIPTION_LENGTH, MAX_TEXT_LENGTH,
};

/// Changes the level or description. A risk never moves to another species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHumanRiskCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateHumanRiskError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Human risk '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HumanRisk, UpdateHumanRiskError>> for UpdateHumanRiskCommand {}

impl crate::cqrs::middleware::Command for UpdateHumanRiskCommand {}

impl UpdateHumanRiskCommand {
    pub fn validate(&self) -> Result<(), UpdateHumanRiskError> {
        if self.risk_level.is_none() && self.description.is_none() {
            return Err(UpdateHumanRiskError::NoFieldsToUpdate);
        }
        validate_optional_text(self.risk_level.as_deref(), "risk_level", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.description.as_deref(), "description", MAX_DESCRIPTION_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(human_risk_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateHumanRiskCommand,
) -> Result<HumanRisk, UpdateHumanRiskError> {
    command.validate()?;

    let sql = format!(
        r#"
        UPDATE human_risks
        SET risk_level = COALESCE($2, risk_level),
            description = COALESCE($3, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        HUMAN_RISK_COLUMNS
    );

    let risk = sqlx::query_as::<_, HumanRisk>(&sql)
        .bind(command.id)
        .bind(command.risk_level.as_deref().map(str::trim))
        .bind(command.description.as_deref())
        .fetch_optional(&pool)
        .await?
        .ok_or(UpdateHumanRiskError::NotFound(command.id))?;

    tracing::info!("Human risk updated");
    Ok(risk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_rejected() {
        let command = UpdateHumanRiskCommand {
            id: Uuid::nil(),
            risk_level: None,
            description: None,
        };
        assert!(matches!(command.validate(), Err(UpdateHumanRiskError::NoFieldsToUpdate)));
    }
}
