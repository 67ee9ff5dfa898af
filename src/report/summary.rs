//! Total sales and sold/unsold counts for a month.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::{Error, MonthFilter, TransactionFilter, TransactionStore};

use super::{MonthQuery, ReportService, Reports};

/// Sales totals over the transactions in a month.
///
/// Every field is zero when no transactions match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    /// The sum of the price of every matching transaction.
    pub total_sales: f64,
    /// The number of matching transactions that sold.
    pub total_sold_items: u64,
    /// The number of matching transactions that did not sell.
    pub total_not_sold_items: u64,
}

impl<S: TransactionStore> ReportService<S> {
    /// Summarize the transactions in `month`, or all transactions if `None`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub fn summary(&self, month: Option<MonthFilter>) -> Result<SummaryReport, Error> {
        let filter = TransactionFilter::for_month(month);

        Ok(SummaryReport {
            total_sales: self.store.sum_price(&filter)?,
            total_sold_items: self.store.count_sold(&filter, true)?,
            total_not_sold_items: self.store.count_sold(&filter, false)?,
        })
    }
}

/// Get the sales statistics for the month in the query string.
pub async fn get_statistics(
    State(reports): State<Reports>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<SummaryReport>, Error> {
    let month = MonthFilter::parse(query.month.as_deref())?;

    reports
        .summary(month)
        .inspect_err(|error| tracing::error!("could not compute statistics: {error}"))
        .map(Json)
}
