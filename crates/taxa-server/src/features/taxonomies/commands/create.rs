//! Create taxonomy command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use taxa_common::TaxonomicRank;
use uuid::Uuid;

use crate::features::shared::error_helpers::is_foreign_key_violation;
use crate::features::shared::validation::{parse_id, FieldValidationError};
use crate::features::taxonomies::types::{RankFields, Taxonomy, TAXONOMY_COLUMNS};

/// Command to create a taxonomy record
///
/// ```json
/// { "kingdom_id": "5d0c...", "phylum": "Chordata", "class": "Mammalia",
///   "order": "Carnivora", "family": "Felidae", "genus": "Panthera" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaxonomyCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kingdom_id: Option<String>,
    #[serde(flatten)]
    pub ranks: RankFields,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateTaxonomyError {
    #[error("At least one taxonomic rank is required")]
    NoRanks,

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Kingdom '{0}' does not exist")]
    UnknownKingdom(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Taxonomy, CreateTaxonomyError>> for CreateTaxonomyCommand {}

impl crate::cqrs::middleware::Command for CreateTaxonomyCommand {}

impl CreateTaxonomyCommand {
    /// Checks the ranks and returns the parsed kingdom reference
    pub fn validate(&self) -> Result<Option<Uuid>, CreateTaxonomyError> {
        if self.ranks.is_empty() {
            return Err(CreateTaxonomyError::NoRanks);
        }
        self.ranks.validate()?;

        Ok(self
            .kingdom_id
            .as_deref()
            .map(|id| parse_id(id, "kingdom_id"))
            .transpose()?)
    }
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    command: CreateTaxonomyCommand,
) -> Result<Taxonomy, CreateTaxonomyError> {
    let kingdom_id = command.validate()?;

    let sql = format!(
        r#"
        INSERT INTO taxonomies (kingdom_id, phylum, class, "order", family, genus)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        TAXONOMY_COLUMNS
    );

    let ranks = &command.ranks;
    let taxonomy = sqlx::query_as::<_, Taxonomy>(&sql)
        .bind(kingdom_id)
        .bind(ranks.get(TaxonomicRank::Phylum))
        .bind(ranks.get(TaxonomicRank::Class))
        .bind(ranks.get(TaxonomicRank::Order))
        .bind(ranks.get(TaxonomicRank::Family))
        .bind(ranks.get(TaxonomicRank::Genus))
        .fetch_one(&pool)
        .await
        .map_err(|e| match kingdom_id {
            Some(id) if is_foreign_key_violation(&e) => CreateTaxonomyError::UnknownKingdom(id),
            _ => CreateTaxonomyError::Database(e),
        })?;

    tracing::info!(taxonomy_id = %taxonomy.id, "Taxonomy created");
    Ok(taxonomy)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_read_from_top_level_fields() {
        let command: CreateTaxonomyCommand =
            serde_json::from_str(r#"{"order":"Primates","genus":"Homo"}"#).unwrap();
        assert_eq!(command.ranks.get(TaxonomicRank::Order), Some("Primates"));
        assert!(command.validate().unwrap().is_none());
    }

    #[test]
    fn test_no_ranks_rejected() {
        let command: CreateTaxonomyCommand = serde_json::from_str("{}").unwrap();
        assert!(matches!(command.validate(), Err(CreateTaxonomyError::NoRanks)));
    }

    #[test]
    fn test_malformed_kingdom_id_rejected() {
        let command: CreateTaxonomyCommand =
            serde_json::from_str(r#"{"kingdom_id":"animalia","phylum":"Chordata"}"#).unwrap();
        assert!(matches!(command.validate(), Err(CreateTaxonomyError::Validation(_))));
    }
}
