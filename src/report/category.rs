//! A histogram of transactions by category.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::{CategoryCount, Error, MonthFilter, TransactionFilter, TransactionStore};

use super::{MonthQuery, ReportService, Reports};

/// The category histogram for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryReport {
    /// The month the histogram covers, omitted when it covers all months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthFilter>,
    /// The count for every category that has at least one transaction.
    pub pie_chart_data: Vec<CategoryCount>,
}

impl<S: TransactionStore> ReportService<S> {
    /// Count the transactions in `month` in each category.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub fn category_histogram(&self, month: Option<MonthFilter>) -> Result<CategoryReport, Error> {
        let pie_chart_data = self
            .store
            .count_by_category(&TransactionFilter::for_month(month))?;

        Ok(CategoryReport {
            month,
            pie_chart_data,
        })
    }
}

/// Get the category histogram for the month in the query string.
pub async fn get_category_pie_chart(
    State(reports): State<Reports>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CategoryReport>, Error> {
    let month = MonthFilter::parse(query.month.as_deref())?;

    reports
        .category_histogram(month)
        .inspect_err(|error| tracing::error!("could not compute category histogram: {error}"))
        .map(Json)
}
