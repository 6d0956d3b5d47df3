//! Conservation status ordinal table
//!
//! Conservation statuses are totally ordered from least to most severe. The
//! table is fixed: any label not in it is an unknown rank and every caller
//! has to decide what that means for it (reject it, or sort it with
//! [`UNKNOWN_STATUS_INDEX`]).

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Canonical labels, least severe first.
pub const CONSERVATION_STATUSES: [&str; 7] = [
    "preocupación menor",
    "casi amenazado",
    "vulnerable",
    "en peligro",
    "en peligro crítico",
    "extinto en estado silvestre",
    "extinto",
];

/// Severity index assigned to labels that are not in the table.
///
/// Greater than every valid index, so it sorts after all known statuses in
/// ascending order and before all of them in descending order.
pub const UNKNOWN_STATUS_INDEX: usize = CONSERVATION_STATUSES.len();

/// Position of `label` in the table, compared case-insensitively after trimming.
pub fn status_index(label: &str) -> Option<usize> {
    let needle = label.trim().to_lowercase();
    CONSERVATION_STATUSES.iter().position(|s| *s == needle)
}

/// Severity sort key for a stored status; unknown labels get the sentinel.
pub fn severity_sort_index(label: &str) -> usize {
    status_index(label).unwrap_or(UNKNOWN_STATUS_INDEX)
}

/// A known conservation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConservationStatus {
    LeastConcern,
    NearThreatened,
    Vulnerable,
    Endangered,
    CriticallyEndangered,
    ExtinctInTheWild,
    Extinct,
}

impl ConservationStatus {
    /// All statuses in table order.
    pub const ALL: [ConservationStatus; 7] = [
        ConservationStatus::LeastConcern,
        ConservationStatus::NearThreatened,
        ConservationStatus::Vulnerable,
        ConservationStatus::Endangered,
        ConservationStatus::CriticallyEndangered,
        ConservationStatus::ExtinctInTheWild,
        ConservationStatus::Extinct,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical label, as stored.
    pub fn label(self) -> &'static str {
        CONSERVATION_STATUSES[self.index()]
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Labels from `min` to `max` inclusive, in table order.
    ///
    /// Empty when `min` is more severe than `max`.
    pub fn labels_between(min: Self, max: Self) -> Vec<&'static str> {
        if min > max {
            return Vec::new();
        }
        CONSERVATION_STATUSES[min.index()..=max.index()].to_vec()
    }
}

impl std::str::FromStr for ConservationStatus {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        status_index(s)
            .and_then(Self::from_index)
            .ok_or_else(|| QueryError::UnknownStatus(s.trim().to_string()))
    }
}

impl std::fmt::Display for ConservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ConservationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ConservationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered_like_the_enum() {
        for (i, status) in ConservationStatus::ALL.iter().enumerate() {
            assert_eq!(status.index(), i);
            assert_eq!(status.label(), CONSERVATION_STATUSES[i]);
        }
    }

    #[test]
    fn test_status_index_ignores_case_and_whitespace() {
        assert_eq!(status_index("  Vulnerable "), Some(2));
        assert_eq!(status_index("EN PELIGRO CRÍTICO"), Some(4));
        assert_eq!(status_index("extinto"), Some(6));
        assert_eq!(status_index("extinct"), None);
        assert_eq!(status_index(""), None);
    }

    #[test]
    fn test_unknown_status_gets_sentinel() {
        assert_eq!(severity_sort_index("UNKNOWN_LABEL"), UNKNOWN_STATUS_INDEX);
        assert!(CONSERVATION_STATUSES
            .iter()
            .all(|s| severity_sort_index(s) < UNKNOWN_STATUS_INDEX));
    }

    #[test]
    fn test_parse_canonicalises_label() {
        let status: ConservationStatus = "Casi Amenazado".parse().unwrap();
        assert_eq!(status, ConservationStatus::NearThreatened);
        assert_eq!(status.to_string(), "casi amenazado");
        assert!(matches!(
            "rare".parse::<ConservationStatus>(),
            Err(QueryError::UnknownStatus(s)) if s == "rare"
        ));
    }

    #[test]
    fn test_labels_between() {
        let labels = ConservationStatus::labels_between(
            ConservationStatus::Vulnerable,
            ConservationStatus::CriticallyEndangered,
        );
        assert_eq!(labels, vec!["vulnerable", "en peligro", "en peligro crítico"]);
        assert!(ConservationStatus::labels_between(
            ConservationStatus::Extinct,
            ConservationStatus::Vulnerable
        )
        .is_empty());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&ConservationStatus::ExtinctInTheWild).unwrap();
        assert_eq!(json, "\"extinto en estado silvestre\"");
        let parsed: ConservationStatus = serde_json::from_str("\"EN PELIGRO\"").unwrap();
        assert_eq!(parsed, ConservationStatus::Endangered);
        assert!(serde_json::from_str::<ConservationStatus>("\"rare\"").is_err());
    }
}
