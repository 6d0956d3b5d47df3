use mediator::Request;
use serde::Serialize;
use sqlx::PgPool;
use taxa_common::query::{translator, SpeciesQueryParams};
use taxa_common::{QueryError, TaxonomicRank};

use crate::db::{fetch_group_counts, GroupCount, PipelineError};

/// Species counts per value of one rank, optionally narrowed to values
/// containing `value`. Without `level` the whole collection is one bucket.
///
/// Only the `level` and `value` keys of the query string are read.
#[derive(Debug, Clone, Default)]
pub struct CountByTaxonomyQuery {
    pub params: SpeciesQueryParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyCounts {
    pub level: Option<TaxonomicRank>,
    pub groups: Vec<GroupCount>,
}

#[derive(Debug, thiserror::Error)]
pub enum CountByTaxonomyError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl Request<Result<TaxonomyCounts, CountByTaxonomyError>> for CountByTaxonomyQuery {}

impl crate::cqrs::middleware::Query for CountByTaxonomyQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: CountByTaxonomyQuery,
) -> Result<TaxonomyCounts, CountByTaxonomyError> {
    let params = &query.params;
    let descriptor = translator::group_count(params.level(), params.value())?;
    let level = descriptor.group.and_then(|g| g.rank);
    let groups = fetch_group_counts(&pool, &descriptor).await?;

    Ok(TaxonomyCounts { level, groups })
}
