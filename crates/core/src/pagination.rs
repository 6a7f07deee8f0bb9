//! Pagination and result-size limits for measurement listings and reports.

use serde::Serialize;

/// Page size used when the client does not send one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Rows included in an exported report when no `limit` is given.
pub const DEFAULT_REPORT_LIMIT: i64 = 500;
/// Hard cap on rows included in an exported report.
pub const MAX_REPORT_LIMIT: i64 = 2000;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// A 1-based page request, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    /// Build a page from raw query parameters. Pages below 1 become 1.
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: clamp_limit(page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}
