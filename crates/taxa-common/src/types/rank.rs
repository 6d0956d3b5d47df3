//! Taxonomic ranks addressable by species queries

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Accepted rank names, from broadest to narrowest.
pub const RANK_NAMES: [&str; 5] = ["phylum", "class", "order", "family", "genus"];

/// One of the five classification levels stored on a taxonomy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomicRank {
    Phylum,
    Class,
    Order,
    Family,
    Genus,
}

impl TaxonomicRank {
    pub const ALL: [TaxonomicRank; 5] = [
        TaxonomicRank::Phylum,
        TaxonomicRank::Class,
        TaxonomicRank::Order,
        TaxonomicRank::Family,
        TaxonomicRank::Genus,
    ];

    pub fn as_str(self) -> &'static str {
        RANK_NAMES[self as usize]
    }
}

impl std::str::FromStr for TaxonomicRank {
    type Err = QueryError;

    /// Exact, lowercase match only; `"Order"` or `"kingdom"` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phylum" => Ok(TaxonomicRank::Phylum),
            "class" => Ok(TaxonomicRank::Class),
            "order" => Ok(TaxonomicRank::Order),
            "family" => Ok(TaxonomicRank::Family),
            "genus" => Ok(TaxonomicRank::Genus),
            other => Err(QueryError::UnknownRank(other.to_string())),
        }
    }
}

impl std::fmt::Display for TaxonomicRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
