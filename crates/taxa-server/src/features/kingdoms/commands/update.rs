use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::kingdoms::types::{Kingdom, KINGDOM_COLUMNS};
use crate::features::shared::error_helpers::is_unique_violation;
use crate::features::shared::validation::{
    validate_optional_text, FieldValidationError, MAX_DESCRIPTION_LENGTH, MAX_TEXT_LENGTH,
};

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKingdomCommand {
    /// Set from the path, never from the body
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateKingdomError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Kingdom '{0}' not found")]
    NotFound(Uuid),

    #[error("Kingdom '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Kingdom, UpdateKingdomError>> for UpdateKingdomCommand {}

impl crate::cqrs::middleware::Command for UpdateKingdomCommand {}

impl UpdateKingdomCommand {
    pub fn validate(&self) -> Result<(), UpdateKingdomError> {
        if self.name.is_none() && self.description.is_none() {
            return Err(UpdateKingdomError::NoFieldsToUpdate);
        }
        validate_optional_text(self.name.as_deref(), "name", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.description.as_deref(), "description", MAX_DESCRIPTION_LENGTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(kingdom_id = %command.id))]
pub async fn handle(pool: PgPool, command: UpdateKingdomCommand) -> Result<Kingdom, UpdateKingdomError> {
    command.validate()?;

    let name = command.name.as_deref().map(str::trim);
    let sql = format!(
        r#"
        UPDATE kingdoms
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        KINGDOM_COLUMNS
    );

    let kingdom = sqlx::query_as::<_, Kingdom>(&sql)
        .bind(command.id)
        .bind(name)
        .bind(command.description.as_deref())
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UpdateKingdomError::DuplicateName(name.unwrap_or_default().to_string())
            } else {
                UpdateKingdomError::Database(e)
            }
        })?
        .ok_or(UpdateKingdomError::NotFound(command.id))?;

    tracing::info!("Kingdom updated");
    Ok(kingdom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_rejected() {
        let command = UpdateKingdomCommand {
            id: Uuid::new_v4(),
            name: None,
            description: None,
        };
        assert!(matches!(command.validate(), Err(UpdateKingdomError::NoFieldsToUpdate)));
    }

    #[test]
    fn test_blank_name_rejected() {
        let command = UpdateKingdomCommand {
            id: Uuid::new_v4(),
            name: Some(String::new()),
            description: None,
        };
        assert!(matches!(command.validate(), Err(UpdateKingdomError::Validation(_))));
    }
}
