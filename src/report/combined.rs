//! Combines the summary, price histogram and category histogram into one response.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{Error, MonthFilter, TransactionStore};

use super::{CategoryReport, PriceRangeReport, ReportService, Reports, SummaryReport};

/// The three month-filtered reports for the same month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// The sales summary.
    pub statistics: SummaryReport,
    /// The price histogram.
    pub bar_chart_data: PriceRangeReport,
    /// The category histogram.
    pub pie_chart_data: CategoryReport,
}

impl<S> ReportService<S>
where
    S: TransactionStore + Clone + Send + Sync + 'static,
{
    /// Build the summary, price histogram and category histogram for `month`.
    ///
    /// The three reports are queried concurrently on the blocking thread pool.
    ///
    /// # Errors
    /// Returns the first error from any of the three reports; no partial
    /// result is returned.
    pub async fn combined(&self, month: Option<MonthFilter>) -> Result<CombinedReport, Error> {
        let (statistics, bar_chart_data, pie_chart_data) = tokio::try_join!(
            self.spawn_report(move |reports| reports.summary(month)),
            self.spawn_report(move |reports| reports.price_histogram(month)),
            self.spawn_report(move |reports| reports.category_histogram(month)),
        )?;

        Ok(CombinedReport {
            statistics,
            bar_chart_data,
            pie_chart_data,
        })
    }

    /// Start `report` on the blocking thread pool and return a future for its result.
    fn spawn_report<T, F>(&self, report: F) -> impl Future<Output = Result<T, Error>>
    where
        T: Send + 'static,
        F: FnOnce(&Self) -> Result<T, Error> + Send + 'static,
    {
        let reports = self.clone();
        let handle = tokio::task::spawn_blocking(move || report(&reports));

        async move {
            handle
                .await
                .map_err(|error| Error::TaskFailed(error.to_string()))?
        }
    }
}

#[derive(Serialize)]
struct CombinedResponse {
    month: BTreeMap<String, String>,
    #[serde(flatten)]
    report: CombinedReport,
}

#[derive(Serialize)]
struct CombinedErrorResponse {
    message: &'static str,
    error: String,
}

/// Get the summary, price histogram and category histogram for the month in
/// the query string.
///
/// The query string is echoed back under `month`. Any failure, including an
/// invalid month, fails the whole request with a 500.
pub async fn get_combined_data(
    State(reports): State<Reports>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    let result = match MonthFilter::parse(query.get("month").map(String::as_str)) {
        Ok(month) => reports.combined(month).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(report) => Json(CombinedResponse {
            month: query,
            report,
        })
        .into_response(),
        Err(error) => {
            tracing::error!("Error fetching data for combined report: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CombinedErrorResponse {
                    message: "Error fetching combined data",
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}
