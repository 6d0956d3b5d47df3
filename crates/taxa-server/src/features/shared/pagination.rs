//! Page windows for the list endpoints
//!
//! ```rust,ignore
//! let window = PaginationParams::from_query(query.page, query.per_page)?;
//! let rows = fetch(window.limit(), window.offset()).await?;
//! let page = Paginated::from_items(rows, &window, total);
//! ```

use serde::{Deserialize, Serialize};

/// Largest accepted `per_page`.
pub const MAX_PER_PAGE: i64 = 100;

/// `per_page` used when the request has none.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// A checked `page`/`per_page` pair; `page` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    page: i64,
    per_page: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PaginationParams {
    /// Build a window from raw query values. Absent values take the
    /// defaults; out-of-range ones are rejected rather than clamped.
    pub fn from_query(page: Option<i64>, per_page: Option<i64>) -> Result<Self, &'static str> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err("Page must be greater than 0");
        }

        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE);
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err("Per page must be between 1 and 100");
        }

        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Returned under `meta.pagination`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl PaginationMetadata {
    pub fn new(window: &PaginationParams, total: i64) -> Self {
        let total_pages = (total + window.per_page - 1) / window.per_page;
        Self {
            page: window.page,
            per_page: window.per_page,
            total,
            total_pages,
            has_more: window.page < total_pages,
        }
    }
}

/// One page of rows plus where it sits in the whole list
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    pub fn from_items(items: Vec<T>, window: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::new(window, total),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_use_defaults() {
        let window = PaginationParams::from_query(None, None).unwrap();
        assert_eq!(window, PaginationParams::default());
        assert_eq!(window.limit(), 20);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(PaginationParams::from_query(Some(0), None).is_err());
        assert!(PaginationParams::from_query(Some(-4), None).is_err());
        assert!(PaginationParams::from_query(None, Some(0)).is_err());
        assert!(PaginationParams::from_query(None, Some(MAX_PER_PAGE + 1)).is_err());
    }

    #[test]
    fn test_offset_skips_earlier_pages() {
        let window = PaginationParams::from_query(Some(3), Some(25)).unwrap();
        assert_eq!(window.offset(), 50);
        assert_eq!(window.page(), 3);
    }

    #[test]
    fn test_metadata_counts_partial_last_page() {
        let window = PaginationParams::from_query(Some(2), Some(20)).unwrap();
        let meta = PaginationMetadata::new(&window, 41);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_more);

        let last = PaginationParams::from_query(Some(3), Some(20)).unwrap();
        assert!(!PaginationMetadata::new(&last, 41).has_more);

        let empty = PaginationMetadata::new(&PaginationParams::default(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_more);
    }
}
