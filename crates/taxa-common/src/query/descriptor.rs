//! Query descriptor: the storage-agnostic form of a species query
//!
//! A [`QueryDescriptor`] is an immutable value built per request by the
//! [`translator`](super::translator) and handed to whatever executes it. It
//! never holds references back into the request, so it can be logged,
//! compared, and sent across threads freely.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::types::TaxonomicRank;

/// Prefix under which the joined taxonomy record's ranks are addressed.
pub const JOINED_TAXONOMY_PREFIX: &str = "joined_taxonomy";

/// How the taxonomy join treats species without a matching taxonomy record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    /// Species without a taxonomy are dropped.
    RequireMatch,
    /// Species without a taxonomy flow through with empty rank fields.
    PreserveUnmatched,
}

/// A field a condition can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPath {
    ScientificName,
    ConservationStatus,
    Countries,
    /// A rank on the joined taxonomy record, never on the species itself.
    JoinedTaxonomy(TaxonomicRank),
}

impl FieldPath {
    /// Whether the field holds a set of values rather than a single one.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, FieldPath::Countries)
    }

    pub fn requires_join(&self) -> bool {
        matches!(self, FieldPath::JoinedTaxonomy(_))
    }
}

/// A single predicate on a species document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// Case-insensitive literal substring match. The pattern is never
    /// interpreted as a regular expression.
    Contains { field: FieldPath, pattern: String },
    /// Equality with any of `values`; for multi-valued fields, a non-empty
    /// intersection.
    AnyOf { field: FieldPath, values: Vec<String> },
}

impl Condition {
    pub fn contains(field: FieldPath, pattern: impl Into<String>) -> Self {
        Condition::Contains {
            field,
            pattern: pattern.into(),
        }
    }

    pub fn any_of(field: FieldPath, values: Vec<String>) -> Self {
        Condition::AnyOf { field, values }
    }

    pub fn field(&self) -> FieldPath {
        match self {
            Condition::Contains { field, .. } | Condition::AnyOf { field, .. } => *field,
        }
    }
}

/// Combination of conditions a document must satisfy.
///
/// There is no empty `All` or `NoneOf`: "no conditions" is always the
/// explicit [`Filter::MatchAll`], so executors never have to agree on what an
/// empty AND or NOR evaluates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "combinator", content = "conditions", rename_all = "snake_case")]
pub enum Filter {
    MatchAll,
    /// Every condition holds.
    All(Vec<Condition>),
    /// No condition holds.
    NoneOf(Vec<Condition>),
}

impl Filter {
    pub fn all(conditions: Vec<Condition>) -> Self {
        if conditions.is_empty() {
            Filter::MatchAll
        } else {
            Filter::All(conditions)
        }
    }

    pub fn none_of(conditions: Vec<Condition>) -> Self {
        if conditions.is_empty() {
            Filter::MatchAll
        } else {
            Filter::NoneOf(conditions)
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        match self {
            Filter::MatchAll => &[],
            Filter::All(conditions) | Filter::NoneOf(conditions) => conditions,
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Filter::MatchAll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = crate::error::QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "-1" => Ok(SortDirection::Descending),
            _ => Err(crate::error::QueryError::InvalidDirection(s.to_string())),
        }
    }
}

/// Sort keys. All of them are derived at execution time and never appear in
/// the returned documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Index of the conservation status in the ordinal table, unknown
    /// statuses mapped to [`UNKNOWN_STATUS_INDEX`](crate::types::UNKNOWN_STATUS_INDEX).
    SeverityRank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Output fields a projection can keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedField {
    CommonName,
    ScientificName,
    ConservationStatus,
    GeographicDistribution,
}

impl ProjectedField {
    pub fn name(self) -> &'static str {
        match self {
            ProjectedField::CommonName => "common_name",
            ProjectedField::ScientificName => "scientific_name",
            ProjectedField::ConservationStatus => "conservation_status",
            ProjectedField::GeographicDistribution => "geographic_distribution",
        }
    }
}

/// Fields to keep. The internal identifier is never part of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub fields: Vec<ProjectedField>,
}

/// Count documents per value of `rank`, or all together when `rank` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grouping {
    pub rank: Option<TaxonomicRank>,
}

/// Canonical description of one species query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDescriptor {
    pub join: Option<JoinMode>,
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub limit: Option<NonZeroU32>,
    pub projection: Option<Projection>,
    pub group: Option<Grouping>,
}

impl QueryDescriptor {
    /// Every species, unsorted, full documents.
    pub fn match_all() -> Self {
        Self {
            join: None,
            filter: Filter::MatchAll,
            sort: None,
            limit: None,
            projection: None,
            group: None,
        }
    }

    pub fn needs_join(&self) -> bool {
        self.join.is_some()
    }

    pub fn is_grouped(&self) -> bool {
        self.group.is_some()
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::match_all()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_collapse_to_match_all() {
        assert_eq!(Filter::all(vec![]), Filter::MatchAll);
        assert_eq!(Filter::none_of(vec![]), Filter::MatchAll);
        assert!(Filter::none_of(vec![]).conditions().is_empty());
    }

    #[test]
    fn test_only_joined_ranks_require_the_join() {
        let joined = FieldPath::JoinedTaxonomy(TaxonomicRank::Genus);
        assert!(joined.requires_join());
        assert!(!joined.is_multi_valued());
        assert!(FieldPath::Countries.is_multi_valued());
        assert!(!FieldPath::ScientificName.requires_join());
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!("-1".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_descriptor_serializes_for_logging() {
        let descriptor = QueryDescriptor {
            filter: Filter::all(vec![Condition::contains(FieldPath::ScientificName, "panthera")]),
            ..QueryDescriptor::match_all()
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["filter"]["combinator"], "all");
        assert_eq!(json["filter"]["conditions"][0]["op"], "contains");
        assert_eq!(json["filter"]["conditions"][0]["pattern"], "panthera");
    }
}
