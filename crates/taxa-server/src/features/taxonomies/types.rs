use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taxa_common::TaxonomicRank;
use uuid::Uuid;

use crate::features::shared::validation::{
    validate_optional_text, FieldValidationError, MAX_TEXT_LENGTH,
};

pub const TAXONOMY_COLUMNS: &str =
    r#"id, kingdom_id, phylum, class, "order", family, genus, created_at, updated_at"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Taxonomy {
    pub id: Uuid,
    pub kingdom_id: Option<Uuid>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The five rank values as sent by clients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phylum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,
}

impl RankFields {
    pub fn get(&self, rank: TaxonomicRank) -> Option<&str> {
        match rank {
            TaxonomicRank::Phylum => self.phylum.as_deref(),
            TaxonomicRank::Class => self.class.as_deref(),
            TaxonomicRank::Order => self.order.as_deref(),
            TaxonomicRank::Family => self.family.as_deref(),
            TaxonomicRank::Genus => self.genus.as_deref(),
        }
        .map(str::trim)
    }

    pub fn is_empty(&self) -> bool {
        TaxonomicRank::ALL.iter().all(|rank| self.get(*rank).is_none())
    }

    /// Present ranks must be non-blank and short enough.
    pub fn validate(&self) -> Result<(), FieldValidationError> {
        for rank in TaxonomicRank::ALL {
            validate_optional_text(self.get(rank), rank.as_str(), MAX_TEXT_LENGTH)?;
        }
        Ok(())
    }
}
