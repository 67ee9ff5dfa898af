//! Reports over the stored transactions.
//!
//! Every report accepts an optional [MonthFilter](crate::MonthFilter) and is
//! produced by [ReportService], which queries the [TransactionStore] it was
//! constructed with. Each report kind lives in its own module alongside the
//! route handler that serves it.

mod category;
mod combined;
mod listing;
mod price_range;
mod summary;

use axum::extract::FromRef;
use serde::Deserialize;

use crate::{AppState, PaginationConfig, SQLiteTransactionStore, TransactionStore};

pub use category::{CategoryReport, get_category_pie_chart};
pub use combined::{CombinedReport, get_combined_data};
pub use listing::{ListingQuery, ListingReport, get_transactions};
pub use price_range::{PriceRangeReport, RangeCount, get_price_range_statistics};
pub use summary::{SummaryReport, get_statistics};

/// Produces reports from the transactions in a [TransactionStore].
#[derive(Debug, Clone)]
pub struct ReportService<S> {
    store: S,
    pagination_config: PaginationConfig,
}

impl<S: TransactionStore> ReportService<S> {
    /// Create a report service that reads from `store`.
    ///
    /// `pagination_config` supplies the page and page size used by the
    /// listing report when the request does not specify them.
    pub fn new(store: S, pagination_config: PaginationConfig) -> Self {
        Self {
            store,
            pagination_config,
        }
    }
}

/// The report service used by the route handlers.
pub(crate) type Reports = ReportService<SQLiteTransactionStore>;

impl FromRef<AppState> for Reports {
    fn from_ref(state: &AppState) -> Self {
        ReportService::new(state.store.clone(), state.pagination_config.clone())
    }
}

/// The query parameters accepted by the month-filtered reports.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The raw month, parsed with [MonthFilter::parse](crate::MonthFilter::parse).
    pub month: Option<String>,
}
