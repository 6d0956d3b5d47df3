use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::validation::{parse_id, FieldValidationError};
use crate::features::shared::{Paginated, PaginationParams};
use crate::features::taxonomies::types::{Taxonomy, TAXONOMY_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTaxonomiesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Only taxonomies under this kingdom
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kingdom_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListTaxonomiesError {
    #[error("{0}")]
    InvalidPagination(&'static str),

    #[error(transparent)]
    Validation(#[from] FieldValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Taxonomy>, ListTaxonomiesError>> for ListTaxonomiesQuery {}

impl crate::cqrs::middleware::Query for ListTaxonomiesQuery {}

impl ListTaxonomiesQuery {
    pub fn pagination(&self) -> Result<PaginationParams, ListTaxonomiesError> {
        PaginationParams::from_query(self.page, self.per_page).map_err(ListTaxonomiesError::InvalidPagination)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListTaxonomiesQuery,
) -> Result<Paginated<Taxonomy>, ListTaxonomiesError> {
    let params = query.pagination()?;

    let kingdom_id = query
        .kingdom_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|id| parse_id(id, "kingdom_id"))
        .transpose()?;

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM taxonomies WHERE ($1::UUID IS NULL OR kingdom_id = $1)",
    )
    .bind(kingdom_id)
    .fetch_one(&pool)
    .await?;

    let sql = format!(
        r#"SELECT {} FROM taxonomies
        WHERE ($1::UUID IS NULL OR kingdom_id = $1)
        ORDER BY phylum NULLS LAST, class NULLS LAST, "order" NULLS LAST,
                 family NULLS LAST, genus NULLS LAST, id
        LIMIT $2 OFFSET $3"#,
        TAXONOMY_COLUMNS
    );
    let items = sqlx::query_as::<_, Taxonomy>(&sql)
        .bind(kingdom_id)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(&pool)
        .await?;

    Ok(Paginated::from_items(items, &params, total))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_kingdom_filter_rejected_before_query() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://nobody@127.0.0.1:1/taxa")
            .unwrap();
        let query = ListTaxonomiesQuery {
            kingdom_id: Some("plants".to_string()),
            ..ListTaxonomiesQuery::default()
        };
        assert!(matches!(
            handle(pool, query).await,
            Err(ListTaxonomiesError::Validation(_))
        ));
    }
}
