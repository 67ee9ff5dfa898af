//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to return per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A window of rows to select from a query: skip `offset` rows, then take up to `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The number of rows to skip.
    pub offset: u64,
    /// The maximum number of rows to return.
    pub limit: u64,
}

impl Page {
    /// Create the window for the one-based `page` of size `per_page`.
    ///
    /// Page numbers and sizes below 1 are treated as 1.
    pub fn new(page: u64, per_page: u64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);

        Self {
            offset: (page - 1).saturating_mul(per_page),
            limit: per_page,
        }
    }
}
