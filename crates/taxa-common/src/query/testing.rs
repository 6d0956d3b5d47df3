//! In-memory evaluation of descriptors for translator tests
//!
//! Mirrors what the PostgreSQL executor does, over plain structs, so the
//! translator's semantics can be checked against concrete records.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::query::descriptor::{Condition, FieldPath, Filter, JoinMode, QueryDescriptor, SortDirection};
use crate::types::{severity_sort_index, TaxonomicRank};

#[derive(Debug, Clone)]
pub struct Species {
    pub scientific_name: String,
    pub common_name: String,
    pub conservation_status: String,
    pub countries: Vec<String>,
    pub taxonomy: Option<BTreeMap<TaxonomicRank, String>>,
}

pub fn species(scientific_name: &str, status: &str, countries: &[&str]) -> Species {
    Species {
        scientific_name: scientific_name.to_string(),
        common_name: scientific_name.to_lowercase(),
        conservation_status: status.to_string(),
        countries: countries.iter().map(|c| c.to_string()).collect(),
        taxonomy: None,
    }
}

impl Species {
    pub fn with_taxonomy(mut self, phylum: &str, class: &str, order: &str, family: &str, genus: &str) -> Self {
        let values = [phylum, class, order, family, genus];
        self.taxonomy = Some(
            TaxonomicRank::ALL
                .iter()
                .zip(values)
                .map(|(rank, value)| (*rank, value.to_string()))
                .collect(),
        );
        self
    }

    fn rank(&self, rank: TaxonomicRank) -> Option<&str> {
        self.taxonomy.as_ref()?.get(&rank).map(String::as_str)
    }

    fn values(&self, field: FieldPath) -> Vec<&str> {
        match field {
            FieldPath::ScientificName => vec![self.scientific_name.as_str()],
            FieldPath::ConservationStatus => vec![self.conservation_status.as_str()],
            FieldPath::Countries => self.countries.iter().map(String::as_str).collect(),
            FieldPath::JoinedTaxonomy(rank) => self.rank(rank).into_iter().collect(),
        }
    }

    fn document(&self, joined: bool) -> Value {
        let mut doc = json!({
            "id": self.scientific_name.to_lowercase().replace(' ', "-"),
            "scientific_name": self.scientific_name,
            "common_name": self.common_name,
            "conservation_status": self.conservation_status,
            "geographic_distribution": { "countries": self.countries },
        });
        if joined {
            doc["joined_taxonomy"] = match &self.taxonomy {
                Some(ranks) => ranks
                    .iter()
                    .map(|(rank, value)| (rank.to_string(), Value::from(value.as_str())))
                    .collect::<Map<_, _>>()
                    .into(),
                None => Value::Null,
            };
        }
        doc
    }
}

fn holds(condition: &Condition, record: &Species) -> bool {
    match condition {
        Condition::Contains { field, pattern } => {
            let needle = pattern.to_lowercase();
            record
                .values(*field)
                .iter()
                .any(|v| v.to_lowercase().contains(&needle))
        },
        Condition::AnyOf { field, values } => record
            .values(*field)
            .iter()
            .any(|v| values.iter().any(|wanted| wanted == v)),
    }
}

fn matches(filter: &Filter, record: &Species) -> bool {
    match filter {
        Filter::MatchAll => true,
        Filter::All(conditions) => conditions.iter().all(|c| holds(c, record)),
        Filter::NoneOf(conditions) => !conditions.iter().any(|c| holds(c, record)),
    }
}

fn selected<'a>(descriptor: &QueryDescriptor, records: &'a [Species]) -> Vec<&'a Species> {
    records
        .iter()
        .filter(|r| descriptor.join != Some(JoinMode::RequireMatch) || r.taxonomy.is_some())
        .filter(|r| matches(&descriptor.filter, r))
        .collect()
}

/// Documents returned for a non-grouped descriptor, in output order.
pub fn evaluate(descriptor: &QueryDescriptor, records: &[Species]) -> Vec<Value> {
    let mut rows = selected(descriptor, records);

    if let Some(sort) = descriptor.sort {
        match sort.direction {
            SortDirection::Ascending => {
                rows.sort_by_key(|r| severity_sort_index(&r.conservation_status))
            },
            SortDirection::Descending => {
                rows.sort_by_key(|r| Reverse(severity_sort_index(&r.conservation_status)))
            },
        }
    }

    if let Some(limit) = descriptor.limit {
        rows.truncate(limit.get() as usize);
    }

    rows.into_iter()
        .map(|r| {
            let doc = r.document(descriptor.needs_join());
            match &descriptor.projection {
                Some(projection) => projection
                    .fields
                    .iter()
                    .map(|f| (f.name().to_string(), doc[f.name()].clone()))
                    .collect::<Map<_, _>>()
                    .into(),
                None => doc,
            }
        })
        .collect()
}

/// Group counts for a grouped descriptor, ordered by key with `None` first.
pub fn group_counts(descriptor: &QueryDescriptor, records: &[Species]) -> Vec<(Option<String>, u64)> {
    let rows = selected(descriptor, records);
    let rank = descriptor.group.and_then(|g| g.rank);

    let Some(rank) = rank else {
        return vec![(None, rows.len() as u64)];
    };

    let mut counts: BTreeMap<Option<String>, u64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.rank(rank).map(str::to_string)).or_default() += 1;
    }
    counts.into_iter().collect()
}
