//! Create kingdom command
//!
//! The command is plain data plus `validate()`; `handle` holds the SQL.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::kingdoms::types::{Kingdom, KINGDOM_COLUMNS};
use crate::features::shared::validation::{
    validate_optional_text, validate_text, FieldValidationError, MAX_DESCRIPTION_LENGTH,
    MAX_TEXT_LENGTH,
};
use crate::features::shared::error_helpers::is_unique_violation;

/// Command to create a new kingdom
///
/// ```rust,ignore
/// let command = CreateKingdomCommand {
///     name: "Animalia".to_string(),
///     description: Some("Multicellular heterotrophs".to_string()),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKingdomCommand {
    /// Kingdom name (unique)
    #[serde(default)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateKingdomError {
    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Kingdom '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Kingdom, CreateKingdomError>> for CreateKingdomCommand {}

impl crate::cqrs::middleware::Command for CreateKingdomCommand {}

impl CreateKingdomCommand {
    pub fn validate(&self) -> Result<(), CreateKingdomError> {
        validate_text(&self.name, "name", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.description.as_deref(), "description", MAX_DESCRIPTION_LENGTH)?;
        Ok(())
    }
}

/// Insert the kingdom and return the stored row
///
/// # Errors
///
/// - `Validation` if the name is blank or a field is too long
/// - `DuplicateName` if a kingdom with the same name exists
#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(pool: PgPool, command: CreateKingdomCommand) -> Result<Kingdom, CreateKingdomError> {
    command.validate()?;

    let sql = format!(
        "INSERT INTO kingdoms (name, description) VALUES ($1, $2) RETURNING {}",
        KINGDOM_COLUMNS
    );

    let kingdom = sqlx::query_as::<_, Kingdom>(&sql)
        .bind(command.name.trim())
        .bind(command.description.as_deref())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CreateKingdomError::DuplicateName(command.name.trim().to_string())
            } else {
                CreateKingdomError::Database(e)
            }
        })?;

    tracing::info!(kingdom_id = %kingdom.id, "Kingdom created");
    Ok(kingdom)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_name() {
        let command = CreateKingdomCommand {
            name: "  ".to_string(),
            description: None,
        };
        assert!(matches!(command.validate(), Err(CreateKingdomError::Validation(_))));
    }

    #[test]
    fn test_validation_success() {
        let command = CreateKingdomCommand {
            name: "Plantae".to_string(),
            description: Some("Green plants".to_string()),
        };
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_missing_name_deserializes_to_blank() {
        let command: CreateKingdomCommand =
            serde_json::from_str(r#"{"description":"no name"}"#).unwrap();
        assert!(command.validate().is_err());
    }
}
