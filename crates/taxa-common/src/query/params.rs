//! Request parameters accepted by species queries
//!
//! The query string arrives as loosely-typed key/value pairs. It is parsed
//! once into [`SpeciesQueryParams`], one optional field per recognised key,
//! and the translator only ever sees the typed accessors below.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::query::descriptor::SortDirection;
use crate::types::TaxonomicRank;

/// Rank → substring pattern, blank patterns already removed.
///
/// Only the five [`TaxonomicRank`]s can be keys, so unrecognised rank names
/// cannot reach a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaxonomyFilter {
    patterns: BTreeMap<TaxonomicRank, String>,
}

impl TaxonomyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern for `rank`; blank values are ignored.
    pub fn with(mut self, rank: TaxonomicRank, pattern: impl Into<String>) -> Self {
        self.insert(rank, pattern);
        self
    }

    pub fn insert(&mut self, rank: TaxonomicRank, pattern: impl Into<String>) {
        let pattern = pattern.into();
        let trimmed = pattern.trim();
        if !trimmed.is_empty() {
            self.patterns.insert(rank, trimmed.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Patterns in rank order, broadest first.
    pub fn iter(&self) -> impl Iterator<Item = (TaxonomicRank, &str)> {
        self.patterns.iter().map(|(rank, pattern)| (*rank, pattern.as_str()))
    }
}

/// Every query-string key understood by the species query endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesQueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, alias = "minStatus", skip_serializing_if = "Option::is_none")]
    pub min_status: Option<String>,
    #[serde(default, alias = "maxStatus", skip_serializing_if = "Option::is_none")]
    pub max_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl SpeciesQueryParams {
    /// Scientific-name pattern, `None` when absent or blank.
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// The rank fields present in the request.
    pub fn taxonomy(&self) -> TaxonomyFilter {
        let mut filter = TaxonomyFilter::new();
        for rank in TaxonomicRank::ALL {
            if let Some(pattern) = self.rank_value(rank) {
                filter.insert(rank, pattern);
            }
        }
        filter
    }

    fn rank_value(&self, rank: TaxonomicRank) -> Option<&str> {
        match rank {
            TaxonomicRank::Phylum => self.phylum.as_deref(),
            TaxonomicRank::Class => self.class.as_deref(),
            TaxonomicRank::Order => self.order.as_deref(),
            TaxonomicRank::Family => self.family.as_deref(),
            TaxonomicRank::Genus => self.genus.as_deref(),
        }
    }

    /// Sort direction, ascending when absent.
    pub fn direction(&self) -> QueryResult<SortDirection> {
        match non_blank(self.direction.as_deref()) {
            Some(raw) => raw.parse(),
            None => Ok(SortDirection::Ascending),
        }
    }

    /// Result limit; must be a positive integer when present.
    pub fn limit(&self) -> QueryResult<Option<NonZeroU32>> {
        match non_blank(self.limit.as_deref()) {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .map(Some)
                .map_err(|_| QueryError::InvalidLimit),
            None => Ok(None),
        }
    }

    pub fn level(&self) -> Option<&str> {
        non_blank(self.level.as_deref())
    }

    pub fn value(&self) -> Option<&str> {
        non_blank(self.value.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_drops_blank_ranks() {
        let params = SpeciesQueryParams {
            phylum: Some("Chordata".into()),
            class: Some("   ".into()),
            genus: Some(" Panthera ".into()),
            ..Default::default()
        };
        let taxonomy = params.taxonomy();
        let entries: Vec<_> = taxonomy.iter().collect();
        assert_eq!(
            entries,
            vec![(TaxonomicRank::Phylum, "Chordata"), (TaxonomicRank::Genus, "Panthera")]
        );
    }

    #[test]
    fn test_camel_case_status_aliases() {
        let params: SpeciesQueryParams = serde_json::from_value(serde_json::json!({
            "minStatus": "vulnerable",
            "maxStatus": "extinto"
        }))
        .unwrap();
        assert_eq!(params.min_status.as_deref(), Some("vulnerable"));
        assert_eq!(params.max_status.as_deref(), Some("extinto"));
    }

    #[test]
    fn test_limit_must_be_positive() {
        let mut params = SpeciesQueryParams::default();
        assert_eq!(params.limit().unwrap(), None);

        params.limit = Some("5".into());
        assert_eq!(params.limit().unwrap(), NonZeroU32::new(5));

        for bad in ["0", "-3", "ten", "1.5"] {
            params.limit = Some(bad.into());
            assert_eq!(params.limit(), Err(QueryError::InvalidLimit), "limit '{}'", bad);
        }
    }

    #[test]
    fn test_direction_defaults_to_ascending() {
        let mut params = SpeciesQueryParams::default();
        assert_eq!(params.direction().unwrap(), SortDirection::Ascending);
        params.direction = Some("desc".into());
        assert_eq!(params.direction().unwrap(), SortDirection::Descending);
        params.direction = Some("up".into());
        assert!(matches!(params.direction(), Err(QueryError::InvalidDirection(_))));
    }

    #[test]
    fn test_blank_name_is_absent() {
        let params = SpeciesQueryParams {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(params.name(), None);
    }

    #[test]
    fn test_grouping_keys_are_trimmed() {
        let params = SpeciesQueryParams {
            level: Some(" order ".into()),
            value: Some("\t".into()),
            ..Default::default()
        };
        assert_eq!(params.level(), Some("order"));
        assert_eq!(params.value(), None);
    }
}
