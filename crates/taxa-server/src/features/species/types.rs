//! Species records as stored and as returned by the CRUD endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::habitats::Habitat;
use crate::features::kingdoms::Kingdom;
use crate::features::taxonomies::Taxonomy;

pub const SPECIES_COLUMNS: &str = "id, scientific_name, common_name, conservation_status, \
     countries, kingdom_id, taxonomy_id, habitat_id, created_at, updated_at";

/// Countries a species is found in. Stored as a `TEXT[]` column, exposed
/// as a nested object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GeographicDistribution {
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Species {
    pub id: Uuid,
    pub scientific_name: String,
    pub common_name: String,
    /// Canonical label from the conservation status table
    pub conservation_status: String,
    #[sqlx(flatten)]
    pub geographic_distribution: GeographicDistribution,
    pub kingdom_id: Option<Uuid>,
    pub taxonomy_id: Option<Uuid>,
    pub habitat_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A species with its referenced records resolved. A dangling or absent
/// reference is `null`.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesDetails {
    #[serde(flatten)]
    pub species: Species,
    pub kingdom: Option<Kingdom>,
    pub taxonomy: Option<Taxonomy>,
    pub habitat: Option<Habitat>,
}
