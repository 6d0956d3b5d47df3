//! Create species command
//!
//! The conservation status is stored as its canonical label, so the status
//! queries can match stored values exactly.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use taxa_common::QueryError;
use uuid::Uuid;

use crate::features::shared::error_helpers::{constraint_violation, ConstraintViolation};
use crate::features::shared::validation::{
    canonical_status, normalize_countries, parse_id, validate_text, FieldValidationError,
    MAX_TEXT_LENGTH,
};
use crate::features::species::types::{GeographicDistribution, Species, SPECIES_COLUMNS};

/// Command to create a species
///
/// ```json
/// {
///   "scientific_name": "Panthera leo",
///   "common_name": "Lion",
///   "conservation_status": "Vulnerable",
///   "geographic_distribution": { "countries": ["Kenya", "Tanzania"] },
///   "taxonomy_id": "0b6f..."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpeciesCommand {
    #[serde(default)]
    pub scientific_name: String,

    #[serde(default)]
    pub common_name: String,

    /// Any casing of a known status
    #[serde(default)]
    pub conservation_status: String,

    #[serde(default)]
    pub geographic_distribution: GeographicDistribution,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kingdom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habitat_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateSpeciesError {
    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error(transparent)]
    Status(#[from] QueryError),

    #[error("Species '{0}' already exists")]
    DuplicateScientificName(String),

    #[error("Referenced {0} does not exist")]
    UnknownReference(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Species, CreateSpeciesError>> for CreateSpeciesCommand {}

impl crate::cqrs::middleware::Command for CreateSpeciesCommand {}

/// Checked and normalized insert values
#[derive(Debug)]
pub(crate) struct NewSpecies<'a> {
    pub scientific_name: &'a str,
    pub common_name: &'a str,
    pub conservation_status: &'static str,
    pub countries: Vec<String>,
    pub kingdom_id: Option<Uuid>,
    pub taxonomy_id: Option<Uuid>,
    pub habitat_id: Option<Uuid>,
}

pub(crate) fn parse_optional_id(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<Uuid>, FieldValidationError> {
    value.map(|id| parse_id(id, field)).transpose()
}

impl CreateSpeciesCommand {
    pub(crate) fn validate(&self) -> Result<NewSpecies<'_>, CreateSpeciesError> {
        validate_text(&self.scientific_name, "scientific_name", MAX_TEXT_LENGTH)?;
        validate_text(&self.common_name, "common_name", MAX_TEXT_LENGTH)?;
        validate_text(&self.conservation_status, "conservation_status", MAX_TEXT_LENGTH)?;

        Ok(NewSpecies {
            scientific_name: self.scientific_name.trim(),
            common_name: self.common_name.trim(),
            conservation_status: canonical_status(&self.conservation_status)?,
            countries: normalize_countries(self.geographic_distribution.countries.clone()),
            kingdom_id: parse_optional_id(self.kingdom_id.as_deref(), "kingdom_id")?,
            taxonomy_id: parse_optional_id(self.taxonomy_id.as_deref(), "taxonomy_id")?,
            habitat_id: parse_optional_id(self.habitat_id.as_deref(), "habitat_id")?,
        })
    }
}

/// Insert the species and return the stored row
///
/// # Errors
///
/// - `Validation` for blank names or malformed ids
/// - `Status` for a conservation status outside the known table
/// - `DuplicateScientificName` when the scientific name is taken
/// - `UnknownReference` naming the id column whose record does not exist
#[tracing::instrument(skip(pool, command), fields(scientific_name = %command.scientific_name))]
pub async fn handle(
    pool: PgPool,
    command: CreateSpeciesCommand,
) -> Result<Species, CreateSpeciesError> {
    let new = command.validate()?;

    let sql = format!(
        r#"
        INSERT INTO species (scientific_name, common_name, conservation_status, countries,
                             kingdom_id, taxonomy_id, habitat_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        SPECIES_COLUMNS
    );

    let species = sqlx::query_as::<_, Species>(&sql)
        .bind(new.scientific_name)
        .bind(new.common_name)
        .bind(new.conservation_status)
        .bind(&new.countries)
        .bind(new.kingdom_id)
        .bind(new.taxonomy_id)
        .bind(new.habitat_id)
        .fetch_one(&pool)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(ConstraintViolation::Unique) => {
                CreateSpeciesError::DuplicateScientificName(new.scientific_name.to_string())
            },
            Some(ConstraintViolation::ForeignKey { column }) => CreateSpeciesError::UnknownReference(
                column.unwrap_or_else(|| "record".to_string()),
            ),
            None => CreateSpeciesError::Database(e),
        })?;

    tracing::info!(species_id = %species.id, status = %species.conservation_status, "Species created");
    Ok(species)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn lion() -> CreateSpeciesCommand {
        serde_json::from_value(serde_json::json!({
            "scientific_name": " Panthera leo ",
            "common_name": "Lion",
            "conservation_status": "VULNERABLE",
            "geographic_distribution": { "countries": ["Kenya", " Kenya", "", "Tanzania"] }
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_normalizes_input() {
        let command = lion();
        let new = command.validate().unwrap();
        assert_eq!(new.scientific_name, "Panthera leo");
        assert_eq!(new.conservation_status, "vulnerable");
        assert_eq!(new.countries, vec!["Kenya", "Tanzania"]);
        assert!(new.taxonomy_id.is_none());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut command = lion();
        command.conservation_status = "thriving".to_string();
        assert!(matches!(
            command.validate(),
            Err(CreateSpeciesError::Status(QueryError::UnknownStatus(_)))
        ));
    }

    #[test]
    fn test_malformed_reference_rejected() {
        let mut command = lion();
        command.habitat_id = Some("savanna".to_string());
        assert!(matches!(
            command.validate(),
            Err(CreateSpeciesError::Validation(FieldValidationError::InvalidId { field: "habitat_id", .. }))
        ));
    }

    #[test]
    fn test_missing_distribution_defaults_to_no_countries() {
        let command: CreateSpeciesCommand = serde_json::from_str(
            r#"{"scientific_name":"Bufo bufo","common_name":"Toad","conservation_status":"preocupación menor"}"#,
        )
        .unwrap();
        assert!(command.validate().unwrap().countries.is_empty());
    }
}
