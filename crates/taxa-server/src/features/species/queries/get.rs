use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::species::types::{Species, SpeciesDetails, SPECIES_COLUMNS};
use crate::features::{habitats, kingdoms, taxonomies};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSpeciesQuery {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetSpeciesError {
    #[error("Species '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<SpeciesDetails, GetSpeciesError>> for GetSpeciesQuery {}

impl crate::cqrs::middleware::Query for GetSpeciesQuery {}

/// Fetch a species and resolve its kingdom, taxonomy and habitat.
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetSpeciesQuery) -> Result<SpeciesDetails, GetSpeciesError> {
    let sql = format!("SELECT {} FROM species WHERE id = $1", SPECIES_COLUMNS);
    let species = sqlx::query_as::<_, Species>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetSpeciesError::NotFound(query.id))?;

    let kingdom = match species.kingdom_id {
        Some(id) => kingdoms::queries::get::fetch(&pool, id).await?,
        None => None,
    };
    let taxonomy = match species.taxonomy_id {
        Some(id) => taxonomies::queries::get::fetch(&pool, id).await?,
        None => None,
    };
    let habitat = match species.habitat_id {
        Some(id) => habitats::queries::get::fetch(&pool, id).await?,
        None => None,
    };

    Ok(SpeciesDetails {
        species,
        kingdom,
        taxonomy,
        habitat,
    })
}
