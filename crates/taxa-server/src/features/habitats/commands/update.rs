use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::habitats::types::{Habitat, HABITAT_COLUMNS};
use crate::features::shared::validation::{
    validate_optional_text, FieldValidationError, MAX_DESCRIPTION_LENGTH, MAX_TEXT_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHabitatCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateHabitatError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Habitat '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Habitat, UpdateHabitatError>> for UpdateHabitatCommand {}

impl crate::cqrs::middleware::Command for UpdateHabitatCommand {}

impl UpdateHabitatCommand {
    pub fn validate(&self) -> Result<(), UpdateHabitatError> {
        if self.name.is_none() && self.description.is_none() && self.climate.is_none() {
            return Err(UpdateHabitatError::NoFieldsToUpdate);
        }
        validate_optional_text(self.name.as_deref(), "name", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.description.as_deref(), "description", MAX_DESCRIPTION_LENGTH)?;
        validate_optional_text(self.climate.as_deref(), "climate", MAX_TEXT_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(habitat_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateHabitatCommand) -> Result<Habitat, UpdateHabitatError> {
    command.validate()?;

    let sql = format!(
        r#"
        UPDATE habitats
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            climate = COALESCE($4, climate),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        HABITAT_COLUMNS
    );

    let habitat = sqlx::query_as::<_, Habitat>(&sql)
        .bind(command.id)
        .bind(command.name.as_deref().map(str::trim))
        .bind(command.description.as_deref())
        .bind(command.climate.as_deref().map(str::trim))
        .fetch_optional(&pool)
        .await?
        .ok_or(UpdateHabitatError::NotFound(command.id))?;

    tracing::info!("Habitat updated");
    Ok(habitat)
}
