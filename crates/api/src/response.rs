//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Paginated listings
//! add a `pagination` block next to `data`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Page metadata for list endpoints.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of matching rows.
    pub total: i64,
    pub total_pages: i64,
    /// 1-based page number that was returned.
    pub current: i64,
}

impl Pagination {
    pub fn new(total: i64, limit: i64, current: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            total,
            total_pages,
            current,
        }
    }
}

/// `{ "data": [...], "pagination": {...} }` envelope.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(21, 10, 1).total_pages, 3);
        assert_eq!(Pagination::new(20, 10, 2).total_pages, 2);
        assert_eq!(Pagination::new(0, 10, 1).total_pages, 0);
    }
}
