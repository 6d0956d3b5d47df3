use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::habitats::types::{Habitat, HABITAT_COLUMNS};
use crate::features::shared::validation::{
    validate_optional_text, validate_text, FieldValidationError, MAX_DESCRIPTION_LENGTH,
    MAX_TEXT_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHabitatCommand {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form climate label, e.g. "tropical"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateHabitatError {
    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Habitat, CreateHabitatError>> for CreateHabitatCommand {}

impl crate::cqrs::middleware::Command for CreateHabitatCommand {}

impl CreateHabitatCommand {
    pub fn validate(&self) -> Result<(), CreateHabitatError> {
        validate_text(&self.name, "name", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.description.as_deref(), "description", MAX_DESCRIPTION_LENGTH)?;
        validate_optional_text(self.climate.as_deref(), "climate", MAX_TEXT_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: PgPool, command: CreateHabitatCommand) -> Result<Habitat, CreateHabitatError> {
    command.validate()?;

    let sql = format!(
        "INSERT INTO habitats (name, description, climate) VALUES ($1, $2, $3) RETURNING {}",
        HABITAT_COLUMNS
    );

    let habitat = sqlx::query_as::<_, Habitat>(&sql)
        .bind(command.name.trim())
        .bind(command.description.as_deref())
        .bind(command.climate.as_deref().map(str::trim))
        .fetch_one(&pool)
        .await?;

    tracing::info!(habitat_id = %habitat.id, "Habitat created");
    Ok(habitat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_climate_rejected() {
        let command = CreateHabitatCommand {
            name: "Cloud forest".to_string(),
            description: None,
            climate: Some(" ".to_string()),
        };
        assert!(matches!(command.validate(), Err(CreateHabitatError::Validation(_))));
    }
}
