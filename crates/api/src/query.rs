//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size when `limit` is absent.
const DEFAULT_LIMIT: i64 = 10;
/// Largest page size a client may request.
const MAX_LIMIT: i64 = 100;

/// Page-based pagination with optional free-text search
/// (`?page=&limit=&search=`).
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

impl PageParams {
    /// 1-based page number, clamped to at least 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_LIMIT`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Rows to skip. Saturates so huge page numbers yield an empty page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Search text with surrounding whitespace removed; empty means no filter.
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = PageParams::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.search(), None);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let p = PageParams {
            page: Some(-3),
            limit: Some(10_000),
            search: Some("   ".into()),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), MAX_LIMIT);
        assert_eq!(p.search(), None);
    }

    #[test]
    fn huge_page_saturates_offset() {
        let p = PageParams {
            page: Some(i64::MAX),
            limit: Some(10),
            search: None,
        };
        assert_eq!(p.page(), i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn offset_follows_page() {
        let p = PageParams {
            page: Some(3),
            limit: Some(20),
            search: Some(" aljabar ".into()),
        };
        assert_eq!(p.offset(), 40);
        assert_eq!(p.search(), Some("aljabar"));
    }
}
