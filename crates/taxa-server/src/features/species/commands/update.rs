use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use taxa_common::QueryError;
use uuid::Uuid;

use super::create::parse_optional_id;
use crate::features::shared::error_helpers::{constraint_violation, ConstraintViolation};
use crate::features::shared::validation::{
    canonical_status, normalize_countries, validate_optional_text, FieldValidationError,
    MAX_TEXT_LENGTH,
};
use crate::features::species::types::{GeographicDistribution, Species, SPECIES_COLUMNS};

/// Partial update. A present `geographic_distribution` replaces the whole
/// country list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSpeciesCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conservation_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic_distribution: Option<GeographicDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kingdom_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub habitat_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateSpeciesError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error(transparent)]
    Status(#[from] QueryError),

    #[error("Species '{0}' not found")]
    NotFound(Uuid),

    #[error("Species '{0}' already exists")]
    DuplicateScientificName(String),

    #[error("Referenced {0} does not exist")]
    UnknownReference(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Species, UpdateSpeciesError>> for UpdateSpeciesCommand {}

impl crate::cqrs::middleware::Command for UpdateSpeciesCommand {}

#[derive(Debug)]
struct SpeciesChanges {
    conservation_status: Option<&'static str>,
    countries: Option<Vec<String>>,
    kingdom_id: Option<Uuid>,
    taxonomy_id: Option<Uuid>,
    habitat_id: Option<Uuid>,
}

impl UpdateSpeciesCommand {
    fn is_empty(&self) -> bool {
        self.scientific_name.is_none()
            && self.common_name.is_none()
            && self.conservation_status.is_none()
            && self.geographic_distribution.is_none()
            && self.kingdom_id.is_none()
            && self.taxonomy_id.is_none()
            && self.habitat_id.is_none()
    }

    fn validate(&self) -> Result<SpeciesChanges, UpdateSpeciesError> {
        if self.is_empty() {
            return Err(UpdateSpeciesError::NoFieldsToUpdate);
        }
        validate_optional_text(self.scientific_name.as_deref(), "scientific_name", MAX_TEXT_LENGTH)?;
        validate_optional_text(self.common_name.as_deref(), "common_name", MAX_TEXT_LENGTH)?;

        Ok(SpeciesChanges {
            conservation_status: self
                .conservation_status
                .as_deref()
                .map(canonical_status)
                .transpose()?,
            countries: self
                .geographic_distribution
                .as_ref()
                .map(|d| normalize_countries(d.countries.clone())),
            kingdom_id: parse_optional_id(self.kingdom_id.as_deref(), "kingdom_id")?,
            taxonomy_id: parse_optional_id(self.taxonomy_id.as_deref(), "taxonomy_id")?,
            habitat_id: parse_optional_id(self.habitat_id.as_deref(), "habitat_id")?,
        })
    }
}

#[tracing::instrument(skip(pool, command), fields(species_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateSpeciesCommand,
) -> Result<Species, UpdateSpeciesError> {
    let changes = command.validate()?;
    let scientific_name = command.scientific_name.as_deref().map(str::trim);

    let sql = format!(
        r#"
        UPDATE species
        SET scientific_name = COALESCE($2, scientific_name),
            common_name = COALESCE($3, common_name),
            conservation_status = COALESCE($4, conservation_status),
            countries = COALESCE($5, countries),
            kingdom_id = COALESCE($6, kingdom_id),
            taxonomy_id = COALESCE($7, taxonomy_id),
            habitat_id = COALESCE($8, habitat_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        SPECIES_COLUMNS
    );

    let species = sqlx::query_as::<_, Species>(&sql)
        .bind(command.id)
        .bind(scientific_name)
        .bind(command.common_name.as_deref().map(str::trim))
        .bind(changes.conservation_status)
        .bind(changes.countries.as_deref())
        .bind(changes.kingdom_id)
        .bind(changes.taxonomy_id)
        .bind(changes.habitat_id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(ConstraintViolation::Unique) => UpdateSpeciesError::DuplicateScientificName(
                scientific_name.unwrap_or_default().to_string(),
            ),
            Some(ConstraintViolation::ForeignKey { column }) => UpdateSpeciesError::UnknownReference(
                column.unwrap_or_else(|| "record".to_string()),
            ),
            None => UpdateSpeciesError::Database(e),
        })?
        .ok_or(UpdateSpeciesError::NotFound(command.id))?;

    tracing::info!("Species updated");
    Ok(species)
}
