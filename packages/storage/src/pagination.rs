// ABOUTME: Pagination utilities for the todo listing
// ABOUTME: Normalizes page parameters and computes page metadata

use serde::Serialize;

/// Default page size when none (or an unusable one) is supplied
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size to keep listings bounded
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: i64 = 1;

/// A normalized page window.
///
/// Construction always yields `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`,
/// so downstream arithmetic never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = page.max(MIN_PAGE);
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };

        Self { page, page_size }
    }

    /// Build from raw query-string values. Missing or non-numeric input
    /// falls back to the defaults.
    pub fn from_query(page: Option<&str>, page_size: Option<&str>) -> Self {
        Self::new(
            parse_or(page, MIN_PAGE),
            parse_or(page_size, DEFAULT_PAGE_SIZE),
        )
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// SQL LIMIT value
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// SQL OFFSET value
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(MIN_PAGE, DEFAULT_PAGE_SIZE)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Metadata about pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Number of rows matching the filter, independent of the window
    pub total: i64,

    pub page: i64,

    #[serde(rename = "pageSize")]
    pub page_size: i64,

    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(request: &PageRequest, total: i64) -> Self {
        let page_size = request.page_size();
        let total = total.max(0);

        Self {
            total,
            page: request.page(),
            page_size,
            total_pages: (total + page_size - 1) / page_size,
        }
    }
}

/// One window of rows plus its metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total: i64) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total),
        }
    }
}
