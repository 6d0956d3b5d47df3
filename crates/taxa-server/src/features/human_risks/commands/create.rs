//! Create human risk command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::human_risks::types::{HumanRisk, HUMAN_RISK_COLUMNS};
use crate::features::shared::error_helpers::is_foreign_key_violation;
use crate::features::shared::validation::{
    parse_id, validate_optional_text, validate_text, FieldValidationError, MAX_DESCRIPTION_LENGTH,
    MAX_TEXT_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHumanRiskCommand {
    /// Species the risk belongs to
    #[serde(default)]
    pub species_id: String,

    #[serde(default)]
    pub risk_level: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateHumanRiskError {
    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Species '{0}' does not exist")]
    UnknownSpecies(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<HumanRisk, CreateHumanRiskError>> for CreateHumanRiskCommand {}

impl crate::cqrs::middleware::Command for CreateHumanRiskCommand {}

impl CreateHumanRiskCommand {
    /// Returns the parsed species id
    pub fn validate(&self) -> Result<Uuid, CreateHumanRiskError> {
        validate_text(&self.species_id, "species_id", MAX_TEXT_LENGTH)?;
        let species_id = parse_id(&self.species_id, "species_id")?;
        validate_text(&self.risk_level, "risk_level", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.description.as_deref(), "description", MAX_DESCRIPTION_LENGTH)?;
        Ok(species_id)
    }
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    command: CreateHumanRiskCommand,
) -> Result<HumanRisk, CreateHumanRiskError> {
    let species_id = command.validate()?;

    let sql = format!(
        "INSERT INTO human_risks (species_id, risk_level, description) VALUES ($1, $2, $3) RETURNING {}",
        HUMAN_RISK_COLUMNS
    );

    let risk = sqlx::query_as::<_, HumanRisk>(&sql)
        .bind(species_id)
        .bind(command.risk_level.trim())
        .bind(command.description.as_deref())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                CreateHumanRiskError::UnknownSpecies(species_id)
            } else {
                CreateHumanRiskError::Database(e)
            }
        })?;

    tracing::info!(human_risk_id = %risk.id, species_id = %species_id, "Human risk created");
    Ok(risk)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn command(species_id: &str, risk_level: &str) -> CreateHumanRiskCommand {
        CreateHumanRiskCommand {
            species_id: species_id.to_string(),
            risk_level: risk_level.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_species_id_must_be_uuid() {
        let err = command("lion", "high").validate().unwrap_err();
        assert!(matches!(
            err,
            CreateHumanRiskError::Validation(FieldValidationError::InvalidId { field: "species_id", .. })
        ));
    }

    #[test]
    fn test_risk_level_required() {
        let id = Uuid::new_v4().to_string();
        assert!(command(&id, " ").validate().is_err());
        assert!(command(&id, "high").validate().is_ok());
    }

    #[test]
    fn test_missing_species_id_is_required_error() {
        let command: CreateHumanRiskCommand =
            serde_json::from_str(r#"{"risk_level":"high"}"#).unwrap();
        assert!(matches!(
            command.validate(),
            Err(CreateHumanRiskError::Validation(FieldValidationError::Required { .. }))
        ));
    }
}
