//! A searchable, paginated listing of transactions.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, MonthFilter, Page, TransactionFilter, TransactionRecord, TransactionStore,
};

use super::{ReportService, Reports};

/// The options for a listing report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    /// The one-based page number, defaults to the configured default page.
    pub page: Option<u64>,
    /// The number of transactions per page, defaults to the configured page size.
    pub per_page: Option<u64>,
    /// Text to search for in the title and description.
    ///
    /// If the text is a number, transactions must also have exactly that price.
    pub search: String,
    /// Only list transactions sold in this month.
    pub month: Option<MonthFilter>,
}

/// A page of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingReport {
    /// The transactions on the requested page.
    pub transactions: Vec<TransactionRecord>,
    /// The number of matching transactions across all pages.
    pub total: u64,
    /// The page number that was returned.
    pub page: u64,
    /// The page size that was used.
    pub per_page: u64,
}

impl<S: TransactionStore> ReportService<S> {
    /// List one page of the transactions matching `query`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub fn listing(&self, query: ListingQuery) -> Result<ListingReport, Error> {
        let page = query
            .page
            .unwrap_or(self.pagination_config.default_page)
            .max(1);
        let per_page = query
            .per_page
            .unwrap_or(self.pagination_config.default_page_size)
            .max(1);

        let filter = build_listing_filter(&query.search, query.month);
        let transactions = self.store.find(&filter, Some(Page::new(page, per_page)))?;
        let total = self.store.count(&filter)?;

        Ok(ListingReport {
            transactions,
            total,
            page,
            per_page,
        })
    }
}

/// Build the filter for a listing search.
///
/// A blank search term matches everything. Otherwise the term must appear in
/// the title or description, and when the term is a finite number the price
/// must also equal it.
pub(crate) fn build_listing_filter(search: &str, month: Option<MonthFilter>) -> TransactionFilter {
    let term = search.trim();

    if term.is_empty() {
        return TransactionFilter::for_month(month);
    }

    TransactionFilter {
        month,
        text: Some(search.to_owned()),
        price: term.parse::<f64>().ok().filter(|price| price.is_finite()),
        sold: None,
    }
}

/// The raw query string of the listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    page: Option<u64>,
    per_page: Option<u64>,
    #[serde(default)]
    search: String,
    month: Option<String>,
}

/// Get a page of transactions matching the search and month in the query string.
///
/// A `page` or `perPage` that is not a whole number is rejected with a 400.
pub async fn get_transactions(
    State(reports): State<Reports>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<ListingReport>, Error> {
    let Query(params) = params.map_err(|rejection| Error::InvalidPage(rejection.body_text()))?;
    let month = MonthFilter::parse(params.month.as_deref())?;

    let query = ListingQuery {
        page: params.page,
        per_page: params.per_page,
        search: params.search,
        month,
    };

    reports
        .listing(query)
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))
        .map(Json)
}
