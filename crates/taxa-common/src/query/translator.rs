//! Translation of species query parameters into [`QueryDescriptor`]s
//!
//! Every function here is pure: the same arguments always produce an equal
//! descriptor, and a rejected request produces no descriptor at all.
//!
//! # Example
//!
//! ```
//! use taxa_common::query::{translator, TaxonomyFilter};
//! use taxa_common::TaxonomicRank;
//!
//! let ranks = TaxonomyFilter::new().with(TaxonomicRank::Family, "Felidae");
//! let descriptor = translator::name_taxonomy_filter(Some("panthera"), &ranks);
//! assert!(descriptor.needs_join());
//! assert_eq!(descriptor.filter.conditions().len(), 2);
//! ```

use std::num::NonZeroU32;

use crate::error::{QueryError, QueryResult};
use crate::query::descriptor::{
    Condition, FieldPath, Filter, Grouping, JoinMode, ProjectedField, Projection, QueryDescriptor,
    Sort, SortDirection, SortKey,
};
use crate::query::params::TaxonomyFilter;
use crate::types::{ConservationStatus, TaxonomicRank, CONSERVATION_STATUSES};

fn rank_conditions(taxonomy: &TaxonomyFilter) -> Vec<Condition> {
    taxonomy
        .iter()
        .map(|(rank, pattern)| Condition::contains(FieldPath::JoinedTaxonomy(rank), pattern))
        .collect()
}

/// Species whose scientific name and taxonomy ranks contain the given patterns.
///
/// The taxonomy join is requested (in [`JoinMode::RequireMatch`]) only when a
/// rank pattern is present. With no name and no ranks every species matches.
pub fn name_taxonomy_filter(name: Option<&str>, taxonomy: &TaxonomyFilter) -> QueryDescriptor {
    let mut conditions = Vec::with_capacity(taxonomy.len() + 1);

    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        conditions.push(Condition::contains(FieldPath::ScientificName, name));
    }
    conditions.extend(rank_conditions(taxonomy));

    QueryDescriptor {
        join: (!taxonomy.is_empty()).then_some(JoinMode::RequireMatch),
        filter: Filter::all(conditions),
        ..QueryDescriptor::match_all()
    }
}

/// Species whose taxonomy matches none of the given rank patterns.
///
/// Species without a taxonomy record are kept. Excluding nothing returns
/// every species.
pub fn exclusion_filter(taxonomy: &TaxonomyFilter) -> QueryDescriptor {
    if taxonomy.is_empty() {
        return QueryDescriptor {
            join: Some(JoinMode::PreserveUnmatched),
            ..QueryDescriptor::match_all()
        };
    }

    QueryDescriptor {
        join: Some(JoinMode::PreserveUnmatched),
        filter: Filter::none_of(rank_conditions(taxonomy)),
        ..QueryDescriptor::match_all()
    }
}

/// Species present in at least one of a comma-separated list of countries.
pub fn country_filter(country_query: Option<&str>) -> QueryResult<QueryDescriptor> {
    let raw = country_query
        .filter(|q| !q.trim().is_empty())
        .ok_or(QueryError::MissingParameter("country"))?;

    let mut countries: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !countries.iter().any(|c| c == token) {
            countries.push(token.to_string());
        }
    }

    if countries.is_empty() {
        return Err(QueryError::EmptyCountryList);
    }

    Ok(QueryDescriptor {
        filter: Filter::all(vec![Condition::any_of(FieldPath::Countries, countries)]),
        ..QueryDescriptor::match_all()
    })
}

/// Species with exactly the given conservation status.
pub fn status_filter(status: Option<&str>) -> QueryResult<QueryDescriptor> {
    let status: ConservationStatus = status
        .filter(|s| !s.trim().is_empty())
        .ok_or(QueryError::MissingParameter("status"))?
        .parse()?;

    Ok(QueryDescriptor {
        filter: Filter::all(vec![Condition::any_of(
            FieldPath::ConservationStatus,
            vec![status.label().to_string()],
        )]),
        ..QueryDescriptor::match_all()
    })
}

/// Species whose conservation status lies between `min_status` and
/// `max_status`, both inclusive.
///
/// Bounds are read case-insensitively; the IN-list uses the canonical labels.
pub fn status_range_filter(
    min_status: Option<&str>,
    max_status: Option<&str>,
) -> QueryResult<QueryDescriptor> {
    let min_raw = min_status
        .filter(|s| !s.trim().is_empty())
        .ok_or(QueryError::MissingParameter("minStatus"))?;
    let max_raw = max_status
        .filter(|s| !s.trim().is_empty())
        .ok_or(QueryError::MissingParameter("maxStatus"))?;

    let min: ConservationStatus = min_raw.parse()?;
    let max: ConservationStatus = max_raw.parse()?;

    if min > max {
        return Err(QueryError::InvertedRange {
            min: min.label().to_string(),
            max: max.label().to_string(),
        });
    }

    let statuses = ConservationStatus::labels_between(min, max)
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(QueryDescriptor {
        filter: Filter::all(vec![Condition::any_of(FieldPath::ConservationStatus, statuses)]),
        ..QueryDescriptor::match_all()
    })
}

/// All species ordered by conservation-status severity.
///
/// Statuses missing from the ordinal table sort after every known status
/// ascending and before every known status descending.
pub fn sort_by_severity(direction: SortDirection, limit: Option<NonZeroU32>) -> QueryDescriptor {
    QueryDescriptor {
        sort: Some(Sort {
            key: SortKey::SeverityRank,
            direction,
        }),
        limit,
        ..QueryDescriptor::match_all()
    }
}

/// The single most threatened species with a known conservation status.
pub fn most_endangered() -> QueryDescriptor {
    let known = CONSERVATION_STATUSES.iter().map(|s| s.to_string()).collect();
    QueryDescriptor {
        filter: Filter::all(vec![Condition::any_of(FieldPath::ConservationStatus, known)]),
        ..sort_by_severity(SortDirection::Descending, NonZeroU32::new(1))
    }
}

/// Species counts grouped by a taxonomic rank.
///
/// With a `level` and a `value`, only species whose rank contains `value` are
/// counted. Without a `level` everything lands in one bucket and `value` is
/// ignored.
pub fn group_count(level: Option<&str>, value: Option<&str>) -> QueryResult<QueryDescriptor> {
    let rank = level.map(str::parse::<TaxonomicRank>).transpose()?;

    let Some(rank) = rank else {
        return Ok(QueryDescriptor {
            group: Some(Grouping { rank: None }),
            ..QueryDescriptor::match_all()
        });
    };

    let conditions = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| vec![Condition::contains(FieldPath::JoinedTaxonomy(rank), v)])
        .unwrap_or_default();

    Ok(QueryDescriptor {
        join: Some(JoinMode::PreserveUnmatched),
        filter: Filter::all(conditions),
        group: Some(Grouping { rank: Some(rank) }),
        ..QueryDescriptor::match_all()
    })
}

fn projection(fields: [ProjectedField; 3]) -> QueryDescriptor {
    QueryDescriptor {
        projection: Some(Projection {
            fields: fields.to_vec(),
        }),
        ..QueryDescriptor::match_all()
    }
}

/// Common name, scientific name and conservation status of every species.
pub fn simple_projection() -> QueryDescriptor {
    projection([
        ProjectedField::CommonName,
        ProjectedField::ScientificName,
        ProjectedField::ConservationStatus,
    ])
}

/// Common name, scientific name and geographic distribution of every species.
pub fn distribution_projection() -> QueryDescriptor {
    projection([
        ProjectedField::CommonName,
        ProjectedField::ScientificName,
        ProjectedField::GeographicDistribution,
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::testing::{evaluate, group_counts, species, Species};
    use proptest::prelude::*;

    fn animals() -> Vec<Species> {
        vec![
            species("Panthera leo", "vulnerable", &["Kenya", "Tanzania"])
                .with_taxonomy("Chordata", "Mammalia", "Carnivora", "Felidae", "Panthera"),
            species("Gorilla gorilla", "en peligro crítico", &["Gabon"])
                .with_taxonomy("Chordata", "Mammalia", "Primates", "Hominidae", "Gorilla"),
            species("Ateles geoffroyi", "en peligro", &["Mexico", "Peru"])
                .with_taxonomy("Chordata", "Mammalia", "Primates", "Atelidae", "Ateles"),
            species("Bufo bufo", "preocupación menor", &["Spain", "Brazil"])
                .with_taxonomy("Chordata", "Amphibia", "Anura", "Bufonidae", "Bufo"),
            species("Unclassified specimen", "extinto", &["Peru"]),
        ]
    }

    fn names(docs: &[serde_json::Value]) -> Vec<&str> {
        docs.iter()
            .map(|d| d["scientific_name"].as_str().unwrap_or_default())
            .collect()
    }

    // ------------------------------------------------------------------------
    // Name + taxonomy
    // ------------------------------------------------------------------------

    #[test]
    fn test_name_taxonomy_no_inputs_matches_everything() {
        let descriptor = name_taxonomy_filter(None, &TaxonomyFilter::new());
        assert!(descriptor.filter.is_match_all());
        assert!(!descriptor.needs_join());
        assert_eq!(evaluate(&descriptor, &animals()).len(), 5);
    }

    #[test]
    fn test_name_only_does_not_join() {
        let descriptor = name_taxonomy_filter(Some("gorilla"), &TaxonomyFilter::new());
        assert!(!descriptor.needs_join());
        assert_eq!(
            descriptor.filter,
            Filter::All(vec![Condition::contains(FieldPath::ScientificName, "gorilla")])
        );
        assert_eq!(names(&evaluate(&descriptor, &animals())), vec!["Gorilla gorilla"]);
    }

    #[test]
    fn test_name_and_ranks_are_anded_on_joined_paths() {
        let ranks = TaxonomyFilter::new()
            .with(TaxonomicRank::Order, "primate")
            .with(TaxonomicRank::Family, "HOMINIDAE");
        let descriptor = name_taxonomy_filter(Some("gor"), &ranks);

        assert_eq!(descriptor.join, Some(JoinMode::RequireMatch));
        assert_eq!(
            descriptor.filter,
            Filter::All(vec![
                Condition::contains(FieldPath::ScientificName, "gor"),
                Condition::contains(FieldPath::JoinedTaxonomy(TaxonomicRank::Order), "primate"),
                Condition::contains(FieldPath::JoinedTaxonomy(TaxonomicRank::Family), "HOMINIDAE"),
            ])
        );
        assert_eq!(names(&evaluate(&descriptor, &animals())), vec!["Gorilla gorilla"]);
    }

    #[test]
    fn test_rank_filter_drops_species_without_taxonomy() {
        let ranks = TaxonomyFilter::new().with(TaxonomicRank::Phylum, "chordata");
        let result = evaluate(&name_taxonomy_filter(None, &ranks), &animals());
        assert_eq!(result.len(), 4);
        assert!(!names(&result).contains(&"Unclassified specimen"));
    }

    #[test]
    fn test_patterns_are_literal_not_regex() {
        let descriptor = name_taxonomy_filter(Some(".*"), &TaxonomyFilter::new());
        assert!(evaluate(&descriptor, &animals()).is_empty());
    }

    // ------------------------------------------------------------------------
    // Exclusion
    // ------------------------------------------------------------------------

    #[test]
    fn test_exclusion_of_nothing_is_explicit_match_all() {
        let descriptor = exclusion_filter(&TaxonomyFilter::new());
        assert_eq!(descriptor.filter, Filter::MatchAll);
        assert_eq!(descriptor.join, Some(JoinMode::PreserveUnmatched));
        assert_eq!(evaluate(&descriptor, &animals()).len(), 5);
    }

    #[test]
    fn test_exclusion_is_nor_and_keeps_unclassified() {
        let ranks = TaxonomyFilter::new()
            .with(TaxonomicRank::Order, "primates")
            .with(TaxonomicRank::Genus, "bufo");
        let descriptor = exclusion_filter(&ranks);

        assert!(matches!(descriptor.filter, Filter::NoneOf(ref c) if c.len() == 2));
        assert_eq!(
            names(&evaluate(&descriptor, &animals())),
            vec!["Panthera leo", "Unclassified specimen"]
        );
    }

    // ------------------------------------------------------------------------
    // Country
    // ------------------------------------------------------------------------

    #[test]
    fn test_country_tokens_trimmed_and_empty_dropped() {
        let descriptor = country_filter(Some("Brazil, peru ,  ")).unwrap();
        assert_eq!(
            descriptor.filter,
            Filter::All(vec![Condition::any_of(
                FieldPath::Countries,
                vec!["Brazil".to_string(), "peru".to_string()]
            )])
        );
    }

    #[test]
    fn test_country_membership_is_set_intersection() {
        let descriptor = country_filter(Some("Peru,Gabon")).unwrap();
        assert_eq!(
            names(&evaluate(&descriptor, &animals())),
            vec!["Gorilla gorilla", "Ateles geoffroyi", "Unclassified specimen"]
        );
    }

    #[test]
    fn test_country_missing_or_blank_is_rejected() {
        assert_eq!(country_filter(None), Err(QueryError::MissingParameter("country")));
        assert_eq!(country_filter(Some("")), Err(QueryError::MissingParameter("country")));
        assert_eq!(country_filter(Some(" , ,")), Err(QueryError::EmptyCountryList));
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    #[test]
    fn test_status_filter_canonicalises_label() {
        let descriptor = status_filter(Some(" EN PELIGRO ")).unwrap();
        assert_eq!(
            descriptor.filter,
            Filter::All(vec![Condition::any_of(
                FieldPath::ConservationStatus,
                vec!["en peligro".to_string()]
            )])
        );
        assert_eq!(names(&evaluate(&descriptor, &animals())), vec!["Ateles geoffroyi"]);
        assert!(matches!(status_filter(Some("rare")), Err(QueryError::UnknownStatus(_))));
        assert_eq!(status_filter(None), Err(QueryError::MissingParameter("status")));
    }

    #[test]
    fn test_status_range_inclusive_slice() {
        let descriptor = status_range_filter(Some("Vulnerable"), Some("en peligro crítico")).unwrap();
        assert_eq!(
            descriptor.filter,
            Filter::All(vec![Condition::any_of(
                FieldPath::ConservationStatus,
                vec![
                    "vulnerable".to_string(),
                    "en peligro".to_string(),
                    "en peligro crítico".to_string()
                ]
            )])
        );
        assert_eq!(
            names(&evaluate(&descriptor, &animals())),
            vec!["Panthera leo", "Gorilla gorilla", "Ateles geoffroyi"]
        );
    }

    #[test]
    fn test_status_range_inverted_is_rejected() {
        assert_eq!(
            status_range_filter(Some("extinto"), Some("vulnerable")),
            Err(QueryError::InvertedRange {
                min: "extinto".into(),
                max: "vulnerable".into()
            })
        );
    }

    #[test]
    fn test_status_range_missing_or_unknown_bounds() {
        assert_eq!(
            status_range_filter(None, Some("extinto")),
            Err(QueryError::MissingParameter("minStatus"))
        );
        assert_eq!(
            status_range_filter(Some("vulnerable"), Some("  ")),
            Err(QueryError::MissingParameter("maxStatus"))
        );
        assert!(matches!(
            status_range_filter(Some("vulnerable"), Some("gone")),
            Err(QueryError::UnknownStatus(s)) if s == "gone"
        ));
    }

    proptest! {
        #[test]
        fn prop_status_range_is_exact_table_slice(
            min in 0usize..7,
            max in 0usize..7,
            upper in any::<bool>(),
            pad in 0usize..3,
        ) {
            let dress = |label: &str| {
                let label = if upper { label.to_uppercase() } else { label.to_string() };
                format!("{}{}{}", " ".repeat(pad), label, " ".repeat(pad))
            };
            let result = status_range_filter(
                Some(&dress(CONSERVATION_STATUSES[min])),
                Some(&dress(CONSERVATION_STATUSES[max])),
            );

            if min <= max {
                let expected: Vec<String> = CONSERVATION_STATUSES[min..=max]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                prop_assert_eq!(
                    result.unwrap().filter,
                    Filter::All(vec![Condition::any_of(FieldPath::ConservationStatus, expected)])
                );
            } else {
                let is_inverted = matches!(result, Err(QueryError::InvertedRange { .. }));
                prop_assert!(is_inverted);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Severity sort
    // ------------------------------------------------------------------------

    fn sentinel_fixture() -> Vec<Species> {
        vec![
            species("A", "en peligro", &[]),
            species("B", "UNKNOWN_LABEL", &[]),
            species("C", "vulnerable", &[]),
        ]
    }

    #[test]
    fn test_unknown_status_sorts_last_ascending() {
        let docs = evaluate(&sort_by_severity(SortDirection::Ascending, None), &sentinel_fixture());
        assert_eq!(names(&docs), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_unknown_status_sorts_first_descending() {
        let docs = evaluate(&sort_by_severity(SortDirection::Descending, None), &sentinel_fixture());
        assert_eq!(names(&docs), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_severity_sort_is_case_insensitive_and_hides_key() {
        let fixture = vec![species("X", "EXTINTO", &[]), species("Y", "Casi Amenazado", &[])];
        let docs = evaluate(&sort_by_severity(SortDirection::Ascending, None), &fixture);
        assert_eq!(names(&docs), vec!["Y", "X"]);
        assert!(docs.iter().all(|d| d.get("sort_index").is_none()));
    }

    #[test]
    fn test_severity_sort_limit() {
        let descriptor = sort_by_severity(SortDirection::Descending, NonZeroU32::new(2));
        assert_eq!(descriptor.limit, NonZeroU32::new(2));
        assert_eq!(names(&evaluate(&descriptor, &animals())), vec!["Unclassified specimen", "Gorilla gorilla"]);
    }

    #[test]
    fn test_most_endangered_skips_unknown_statuses() {
        let mut fixture = sentinel_fixture();
        fixture.push(species("D", "en peligro crítico", &[]));
        let docs = evaluate(&most_endangered(), &fixture);
        assert_eq!(names(&docs), vec!["D"]);
    }

    // ------------------------------------------------------------------------
    // Grouping
    // ------------------------------------------------------------------------

    #[test]
    fn test_group_without_level_is_single_bucket() {
        let descriptor = group_count(None, None).unwrap();
        assert!(!descriptor.needs_join());
        assert_eq!(group_counts(&descriptor, &animals()), vec![(None, 5)]);
    }

    #[test]
    fn test_group_by_order_with_value() {
        let descriptor = group_count(Some("order"), Some("Primate")).unwrap();
        assert_eq!(descriptor.join, Some(JoinMode::PreserveUnmatched));
        assert_eq!(
            group_counts(&descriptor, &animals()),
            vec![(Some("Primates".to_string()), 2)]
        );
    }

    #[test]
    fn test_group_by_level_only_counts_every_value() {
        let descriptor = group_count(Some("class"), None).unwrap();
        assert!(descriptor.filter.is_match_all());
        assert_eq!(
            group_counts(&descriptor, &animals()),
            vec![
                (None, 1),
                (Some("Amphibia".to_string()), 1),
                (Some("Mammalia".to_string()), 3)
            ]
        );
    }

    #[test]
    fn test_group_with_unknown_level_is_unknown_rank() {
        let err = group_count(Some("kingdom"), Some("Animalia")).unwrap_err();
        assert_eq!(err, QueryError::UnknownRank("kingdom".into()));
        assert_eq!(err.code(), "UNKNOWN_RANK");
    }

    // ------------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------------

    #[test]
    fn test_projections_drop_identifier() {
        let docs = evaluate(&simple_projection(), &animals());
        let keys: Vec<_> = docs[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["common_name", "conservation_status", "scientific_name"]);

        let docs = evaluate(&distribution_projection(), &animals());
        let doc = docs[0].as_object().unwrap();
        assert!(doc.contains_key("geographic_distribution"));
        assert!(!doc.contains_key("id"));
        assert!(!doc.contains_key("conservation_status"));
    }

    #[test]
    fn test_projections_have_no_filter_or_join() {
        for descriptor in [simple_projection(), distribution_projection()] {
            assert!(descriptor.filter.is_match_all());
            assert!(!descriptor.needs_join());
        }
    }

    // ------------------------------------------------------------------------
    // Idempotence
    // ------------------------------------------------------------------------

    #[test]
    fn test_builders_are_idempotent() {
        let ranks = TaxonomyFilter::new().with(TaxonomicRank::Genus, "Panthera");
        assert_eq!(name_taxonomy_filter(Some("leo"), &ranks), name_taxonomy_filter(Some("leo"), &ranks));
        assert_eq!(exclusion_filter(&ranks), exclusion_filter(&ranks));
        assert_eq!(country_filter(Some("Peru")), country_filter(Some("Peru")));
        assert_eq!(
            status_range_filter(Some("vulnerable"), Some("extinto")),
            status_range_filter(Some("vulnerable"), Some("extinto"))
        );
        assert_eq!(
            sort_by_severity(SortDirection::Descending, NonZeroU32::new(3)),
            sort_by_severity(SortDirection::Descending, NonZeroU32::new(3))
        );
        assert_eq!(group_count(Some("genus"), Some("a")), group_count(Some("genus"), Some("a")));
        assert_eq!(simple_projection(), simple_projection());
        assert_eq!(distribution_projection(), distribution_projection());
    }
}
