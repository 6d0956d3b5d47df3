use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use taxa_common::TaxonomicRank;
use uuid::Uuid;

use crate::features::shared::error_helpers::is_foreign_key_violation;
use crate::features::shared::validation::{parse_id, FieldValidationError};
use crate::features::taxonomies::types::{RankFields, Taxonomy, TAXONOMY_COLUMNS};

/// Partial update; absent ranks keep their stored value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaxonomyCommand {
    #[serde(skip)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kingdom_id: Option<String>,
    #[serde(flatten)]
    pub ranks: RankFields,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateTaxonomyError {
    #[error("At least one field must be provided for update")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Taxonomy '{0}' not found")]
    NotFound(Uuid),

    #[error("Kingdom '{0}' does not exist")]
    UnknownKingdom(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Taxonomy, UpdateTaxonomyError>> for UpdateTaxonomyCommand {}

impl crate::cqrs::middleware::Command for UpdateTaxonomyCommand {}

impl UpdateTaxonomyCommand {
    pub fn validate(&self) -> Result<Option<Uuid>, UpdateTaxonomyError> {
        if self.kingdom_id.is_none() && self.ranks.is_empty() {
            return Err(UpdateTaxonomyError::NoFieldsToUpdate);
        }
        self.ranks.validate()?;

        Ok(self
            .kingdom_id
            .as_deref()
            .map(|id| parse_id(id, "kingdom_id"))
            .transpose()?)
    }
}

#[tracing::instrument(skip(pool, command), fields(taxonomy_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateTaxonomyCommand,
) -> Result<Taxonomy, UpdateTaxonomyError> {
    let kingdom_id = command.validate()?;

    let sql = format!(
        r#"
        UPDATE taxonomies
        SET kingdom_id = COALESCE($2, kingdom_id),
            phylum = COALESCE($3, phylum),
            class = COALESCE($4, class),
            "order" = COALESCE($5, "order"),
            family = COALESCE($6, family),
            genus = COALESCE($7, genus),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        TAXONOMY_COLUMNS
    );

    let ranks = &command.ranks;
    let taxonomy = sqlx::query_as::<_, Taxonomy>(&sql)
        .bind(command.id)
        .bind(kingdom_id)
        .bind(ranks.get(TaxonomicRank::Phylum))
        .bind(ranks.get(TaxonomicRank::Class))
        .bind(ranks.get(TaxonomicRank::Order))
        .bind(ranks.get(TaxonomicRank::Family))
        .bind(ranks.get(TaxonomicRank::Genus))
        .fetch_optional(&pool)
        .await
        .map_err(|e| match kingdom_id {
            Some(id) if is_foreign_key_violation(&e) => UpdateTaxonomyError::UnknownKingdom(id),
            _ => UpdateTaxonomyError::Database(e),
        })?
        .ok_or(UpdateTaxonomyError::NotFound(command.id))?;

    tracing::info!("Taxonomy updated");
    Ok(taxonomy)
}
