//! Species query execution
//!
//! Compiles a [`QueryDescriptor`] into one parameterised PostgreSQL statement
//! and runs it. Every user-supplied value travels as a bind parameter; only
//! fixed column names and keywords are spliced into the SQL text.
//!
//! | descriptor                 | SQL                                                   |
//! |----------------------------|-------------------------------------------------------|
//! | `JoinMode::RequireMatch`   | `INNER JOIN taxonomies t ON t.id = s.taxonomy_id`     |
//! | `JoinMode::PreserveUnmatched` | `LEFT JOIN taxonomies t ON t.id = s.taxonomy_id`   |
//! | `Contains`                 | `COALESCE(col ILIKE $n ESCAPE '\', FALSE)`            |
//! | `AnyOf` (scalar)           | `COALESCE(col = ANY($n), FALSE)`                      |
//! | `AnyOf` (countries)        | `COALESCE(s.countries && $n, FALSE)`                  |
//! | `Filter::NoneOf`           | `NOT (c1 OR c2 ...)`                                  |
//! | severity sort              | `COALESCE(array_position($n::text[], ...) - 1, 7)`    |
//!
//! Conditions on a joined rank evaluate to `FALSE` (never `NULL`) for species
//! without a taxonomy, which keeps those species in a `NOT (...)` exclusion.

use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use taxa_common::query::{
    Condition, FieldPath, Filter, JoinMode, ProjectedField, QueryDescriptor, SortDirection,
    SortKey, JOINED_TAXONOMY_PREFIX,
};
use taxa_common::types::{TaxonomicRank, CONSERVATION_STATUSES, UNKNOWN_STATUS_INDEX};
use thiserror::Error;

/// Failure while executing a species query
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The database could not be reached or did not answer in time
    #[error("Species store is unavailable: {0}")]
    StorageUnavailable(#[source] sqlx::Error),

    /// The database rejected the statement, or the descriptor cannot be run
    #[error("Species query could not be executed: {0}")]
    InvalidQuery(String),
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => PipelineError::StorageUnavailable(err),
            other => PipelineError::InvalidQuery(other.to_string()),
        }
    }
}

/// Number of species sharing one value of the grouping rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct GroupCount {
    /// Rank value, or `None` for species without one (and for the single
    /// bucket of an ungrouped count)
    pub key: Option<String>,
    pub count: i64,
}

/// `LIKE` pattern matching `pattern` literally anywhere in the value.
pub fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for ch in pattern.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn rank_column(rank: TaxonomicRank) -> &'static str {
    match rank {
        TaxonomicRank::Phylum => "t.phylum",
        TaxonomicRank::Class => "t.class",
        TaxonomicRank::Order => r#"t."order""#,
        TaxonomicRank::Family => "t.family",
        TaxonomicRank::Genus => "t.genus",
    }
}

fn column(field: FieldPath) -> &'static str {
    match field {
        FieldPath::ScientificName => "s.scientific_name",
        FieldPath::ConservationStatus => "s.conservation_status",
        FieldPath::Countries => "s.countries",
        FieldPath::JoinedTaxonomy(rank) => rank_column(rank),
    }
}

fn projected_column(field: ProjectedField) -> &'static str {
    match field {
        ProjectedField::CommonName => "s.common_name",
        ProjectedField::ScientificName => "s.scientific_name",
        ProjectedField::ConservationStatus => "s.conservation_status",
        ProjectedField::GeographicDistribution => {
            "jsonb_build_object('countries', to_jsonb(s.countries))"
        },
    }
}

const SPECIES_DOCUMENT: &str = "jsonb_build_object(\
    'id', s.id, \
    'scientific_name', s.scientific_name, \
    'common_name', s.common_name, \
    'conservation_status', s.conservation_status, \
    'geographic_distribution', jsonb_build_object('countries', to_jsonb(s.countries)), \
    'kingdom_id', s.kingdom_id, \
    'taxonomy_id', s.taxonomy_id, \
    'habitat_id', s.habitat_id, \
    'created_at', s.created_at, \
    'updated_at', s.updated_at)";

/// Join the descriptor asks for, or a preserving one when it reads joined
/// ranks without asking.
fn effective_join(descriptor: &QueryDescriptor) -> Option<JoinMode> {
    let reads_joined_rank = descriptor
        .filter
        .conditions()
        .iter()
        .any(|c| c.field().requires_join())
        || descriptor.group.and_then(|g| g.rank).is_some();

    descriptor
        .join
        .or(reads_joined_rank.then_some(JoinMode::PreserveUnmatched))
}

fn push_join(qb: &mut QueryBuilder<'static, Postgres>, join: Option<JoinMode>) {
    match join {
        Some(JoinMode::RequireMatch) => {
            qb.push(" INNER JOIN taxonomies t ON t.id = s.taxonomy_id");
        },
        Some(JoinMode::PreserveUnmatched) => {
            qb.push(" LEFT JOIN taxonomies t ON t.id = s.taxonomy_id");
        },
        None => {},
    }
}

fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, condition: &Condition) {
    match condition {
        Condition::Contains { field, pattern } if field.is_multi_valued() => {
            qb.push("EXISTS (SELECT 1 FROM unnest(")
                .push(column(*field))
                .push(") AS v(value) WHERE v.value ILIKE ")
                .push_bind(escape_like(pattern))
                .push(r" ESCAPE '\')");
        },
        Condition::Contains { field, pattern } => {
            qb.push("COALESCE(")
                .push(column(*field))
                .push(" ILIKE ")
                .push_bind(escape_like(pattern))
                .push(r" ESCAPE '\', FALSE)");
        },
        Condition::AnyOf { field, values } if field.is_multi_valued() => {
            qb.push("COALESCE(")
                .push(column(*field))
                .push(" && ")
                .push_bind(values.clone())
                .push(", FALSE)");
        },
        Condition::AnyOf { field, values } => {
            qb.push("COALESCE(")
                .push(column(*field))
                .push(" = ANY(")
                .push_bind(values.clone())
                .push("), FALSE)");
        },
    }
}

fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    let (open, separator, close) = match filter {
        Filter::MatchAll => return,
        Filter::All(_) => (" WHERE ", " AND ", ""),
        Filter::NoneOf(_) => (" WHERE NOT (", " OR ", ")"),
    };

    qb.push(open);
    for (i, condition) in filter.conditions().iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_condition(qb, condition);
    }
    qb.push(close);
}

fn push_document(qb: &mut QueryBuilder<'static, Postgres>, descriptor: &QueryDescriptor, joined: bool) {
    if let Some(projection) = &descriptor.projection {
        qb.push("jsonb_build_object(");
        for (i, field) in projection.fields.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push("'")
                .push(field.name())
                .push("', ")
                .push(projected_column(*field));
        }
        qb.push(")");
        return;
    }

    qb.push(SPECIES_DOCUMENT);

    if joined {
        qb.push(" || jsonb_build_object('")
            .push(JOINED_TAXONOMY_PREFIX)
            .push("', CASE WHEN t.id IS NULL THEN NULL ELSE jsonb_build_object(");
        for (i, rank) in TaxonomicRank::ALL.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push("'")
                .push(rank.as_str())
                .push("', ")
                .push(rank_column(*rank));
        }
        qb.push(") END)");
    }
}

fn push_sort(qb: &mut QueryBuilder<'static, Postgres>, descriptor: &QueryDescriptor) {
    let Some(sort) = descriptor.sort else {
        return;
    };

    let direction = match sort.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };

    match sort.key {
        SortKey::SeverityRank => {
            // lower() follows the database LC_CTYPE; see the initial migration
            let table: Vec<String> = CONSERVATION_STATUSES.iter().map(|s| s.to_string()).collect();
            qb.push(" ORDER BY COALESCE(array_position(")
                .push_bind(table)
                .push("::text[], lower(btrim(s.conservation_status))) - 1, ")
                .push(UNKNOWN_STATUS_INDEX.to_string())
                .push(") ")
                .push(direction)
                .push(", s.scientific_name ASC");
        },
    }
}

/// Statement returning one JSON document per matching species.
pub fn build_documents_query(descriptor: &QueryDescriptor) -> QueryBuilder<'static, Postgres> {
    let join = effective_join(descriptor);
    let mut qb = QueryBuilder::new("SELECT ");

    push_document(&mut qb, descriptor, descriptor.join.is_some());
    qb.push(" AS document FROM species s");
    push_join(&mut qb, join);
    push_filter(&mut qb, &descriptor.filter);
    push_sort(&mut qb, descriptor);

    if let Some(limit) = descriptor.limit {
        qb.push(" LIMIT ").push_bind(i64::from(limit.get()));
    }

    qb
}

/// Statement returning `(key, count)` rows for a grouped descriptor.
pub fn build_group_query(descriptor: &QueryDescriptor) -> QueryBuilder<'static, Postgres> {
    let rank = descriptor.group.and_then(|g| g.rank);
    let mut qb = QueryBuilder::new("SELECT ");

    qb.push(rank.map_or("NULL::text", rank_column))
        .push(" AS key, COUNT(*) AS count FROM species s");
    push_join(&mut qb, effective_join(descriptor));
    push_filter(&mut qb, &descriptor.filter);

    if let Some(rank) = rank {
        qb.push(" GROUP BY ")
            .push(rank_column(rank))
            .push(" ORDER BY key NULLS FIRST");
    }

    qb
}

/// Run a non-grouped descriptor and return the documents in output order.
#[tracing::instrument(skip(pool, descriptor), fields(joined = descriptor.needs_join()))]
pub async fn fetch_documents(
    pool: &PgPool,
    descriptor: &QueryDescriptor,
) -> Result<Vec<Value>, PipelineError> {
    if descriptor.is_grouped() {
        return Err(PipelineError::InvalidQuery(
            "grouped descriptor passed to document execution".to_string(),
        ));
    }

    let mut qb = build_documents_query(descriptor);
    tracing::debug!(sql = qb.sql(), "Executing species query");

    let documents = qb.build_query_scalar::<Value>().fetch_all(pool).await?;

    tracing::debug!(count = documents.len(), "Species query returned");
    Ok(documents)
}

/// Run a grouped descriptor.
#[tracing::instrument(skip(pool, descriptor))]
pub async fn fetch_group_counts(
    pool: &PgPool,
    descriptor: &QueryDescriptor,
) -> Result<Vec<GroupCount>, PipelineError> {
    if !descriptor.is_grouped() {
        return Err(PipelineError::InvalidQuery(
            "ungrouped descriptor passed to group execution".to_string(),
        ));
    }

    let mut qb = build_group_query(descriptor);
    tracing::debug!(sql = qb.sql(), "Executing species group count");

    let groups = qb.build_query_as::<GroupCount>().fetch_all(pool).await?;
    Ok(groups)
}
