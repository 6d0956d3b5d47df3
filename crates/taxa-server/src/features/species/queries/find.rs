//! Filtered, sorted and projected species views
//!
//! Each [`SpeciesQueryKind`] maps the request parameters through exactly one
//! translator operation; the resulting descriptor runs through the species
//! pipeline. Results are JSON documents because projections change their
//! shape.

use mediator::Request;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use taxa_common::query::{translator, SpeciesQueryParams};
use taxa_common::{QueryDescriptor, QueryError, QueryResult};

use crate::db::{fetch_documents, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeciesQueryKind {
    /// `name` plus rank substrings, species without a taxonomy dropped
    Search,
    /// Species whose taxonomy matches none of the rank substrings
    Exclude,
    /// Found in any of a comma-separated `country` list
    Country,
    /// Exactly one conservation `status`
    Status,
    /// Status between `minStatus` and `maxStatus` inclusive
    StatusRange,
    /// Ordered by severity, optional `direction` and `limit`
    SortedByStatus,
    MostEndangered,
    Simple,
    Distribution,
}

impl SpeciesQueryKind {
    pub fn descriptor(self, params: &SpeciesQueryParams) -> QueryResult<QueryDescriptor> {
        match self {
            SpeciesQueryKind::Search => {
                Ok(translator::name_taxonomy_filter(params.name(), &params.taxonomy()))
            },
            SpeciesQueryKind::Exclude => Ok(translator::exclusion_filter(&params.taxonomy())),
            SpeciesQueryKind::Country => translator::country_filter(params.country.as_deref()),
            SpeciesQueryKind::Status => translator::status_filter(params.status.as_deref()),
            SpeciesQueryKind::StatusRange => translator::status_range_filter(
                params.min_status.as_deref(),
                params.max_status.as_deref(),
            ),
            SpeciesQueryKind::SortedByStatus => Ok(translator::sort_by_severity(
                params.direction()?,
                params.limit()?,
            )),
            SpeciesQueryKind::MostEndangered => Ok(translator::most_endangered()),
            SpeciesQueryKind::Simple => Ok(translator::simple_projection()),
            SpeciesQueryKind::Distribution => Ok(translator::distribution_projection()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FindSpeciesQuery {
    pub kind: SpeciesQueryKind,
    pub params: SpeciesQueryParams,
}

#[derive(Debug, thiserror::Error)]
pub enum FindSpeciesError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl Request<Result<Vec<Value>, FindSpeciesError>> for FindSpeciesQuery {}

impl crate::cqrs::middleware::Query for FindSpeciesQuery {}

#[tracing::instrument(skip(pool), fields(kind = ?query.kind))]
pub async fn handle(pool: PgPool, query: FindSpeciesQuery) -> Result<Vec<Value>, FindSpeciesError> {
    let descriptor = query.kind.descriptor(&query.params)?;
    Ok(fetch_documents(&pool, &descriptor).await?)
}
