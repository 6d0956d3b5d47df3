//! Classification of PostgreSQL constraint violations
//!
//! Commands map these onto their own error variants: a unique violation is a
//! conflict, a foreign-key violation means the request named a record that
//! does not exist.

use sqlx::Error as SqlxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    Unique,
    /// `column` is recovered from PostgreSQL's default `<table>_<column>_fkey`
    /// constraint name when possible
    ForeignKey { column: Option<String> },
}

/// The constraint `error` violated, or `None` for any other failure
pub fn constraint_violation(error: &SqlxError) -> Option<ConstraintViolation> {
    let SqlxError::Database(db_err) = error else {
        return None;
    };

    if db_err.is_unique_violation() {
        return Some(ConstraintViolation::Unique);
    }
    if db_err.is_foreign_key_violation() {
        let column = db_err
            .constraint()
            .zip(db_err.table())
            .and_then(|(constraint, table)| fk_column(constraint, table));
        return Some(ConstraintViolation::ForeignKey { column });
    }
    None
}

fn fk_column(constraint: &str, table: &str) -> Option<String> {
    constraint
        .strip_suffix("_fkey")?
        .strip_prefix(table)?
        .strip_prefix('_')
        .filter(|column| !column.is_empty())
        .map(str::to_string)
}

pub fn is_unique_violation(error: &SqlxError) -> bool {
    matches!(constraint_violation(error), Some(ConstraintViolation::Unique))
}

pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    matches!(
        constraint_violation(error),
        Some(ConstraintViolation::ForeignKey { .. })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert_eq!(constraint_violation(&SqlxError::RowNotFound), None);
        assert!(!is_unique_violation(&SqlxError::RowNotFound));
        assert!(!is_foreign_key_violation(&SqlxError::PoolTimedOut));
    }

    #[test]
    fn test_fk_column_from_default_constraint_name() {
        assert_eq!(
            fk_column("species_habitat_id_fkey", "species").as_deref(),
            Some("habitat_id")
        );
        assert_eq!(
            fk_column("human_risks_species_id_fkey", "human_risks").as_deref(),
            Some("species_id")
        );
        assert_eq!(fk_column("custom_name", "species"), None);
        assert_eq!(fk_column("species__fkey", "species"), None);
    }
}
