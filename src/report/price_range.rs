//! A histogram of transaction prices over fixed price ranges.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::{Error, MonthFilter, TransactionFilter, TransactionStore};

use super::{MonthQuery, ReportService, Reports};

/// A price range in the histogram, covering prices from `min` up to the next range's `min`.
struct PriceRange {
    label: &'static str,
    min: f64,
}

const PRICE_RANGES: [PriceRange; 10] = [
    PriceRange { label: "0-100", min: 0.0 },
    PriceRange { label: "101-200", min: 101.0 },
    PriceRange { label: "201-300", min: 201.0 },
    PriceRange { label: "301-400", min: 301.0 },
    PriceRange { label: "401-500", min: 401.0 },
    PriceRange { label: "501-600", min: 501.0 },
    PriceRange { label: "601-700", min: 601.0 },
    PriceRange { label: "701-800", min: 701.0 },
    PriceRange { label: "801-900", min: 801.0 },
    PriceRange { label: "901+", min: 901.0 },
];

/// The number of transactions in a price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCount {
    /// The price range label, e.g. "101-200".
    pub range: String,
    /// How many transactions have a price in the range.
    pub count: u64,
}

/// The price histogram for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeReport {
    /// The month the histogram covers, omitted when it covers all months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthFilter>,
    /// The count for every price range, in increasing order of price.
    pub price_range_statistics: Vec<RangeCount>,
}

impl<S: TransactionStore> ReportService<S> {
    /// Count the transactions in `month` in each price range.
    ///
    /// # Errors
    /// Returns an error if the store cannot be queried.
    pub fn price_histogram(&self, month: Option<MonthFilter>) -> Result<PriceRangeReport, Error> {
        let prices = self.store.prices(&TransactionFilter::for_month(month))?;

        Ok(PriceRangeReport {
            month,
            price_range_statistics: count_prices_by_range(&prices),
        })
    }
}

/// Count `prices` in each of the fixed price ranges.
///
/// Every range is included, even when its count is zero. Each price is
/// counted exactly once, in the last range whose lower bound does not exceed
/// it, so a price of 100.5 counts towards "0-100" and a negative price towards
/// the first range.
pub(crate) fn count_prices_by_range(prices: &[f64]) -> Vec<RangeCount> {
    let mut counts = [0u64; PRICE_RANGES.len()];

    for &price in prices {
        counts[range_index(price)] += 1;
    }

    PRICE_RANGES
        .iter()
        .zip(counts)
        .map(|(price_range, count)| RangeCount {
            range: price_range.label.to_owned(),
            count,
        })
        .collect()
}

fn range_index(price: f64) -> usize {
    PRICE_RANGES
        .iter()
        .rposition(|price_range| price >= price_range.min)
        .unwrap_or(0)
}

/// Get the price histogram for the month in the query string.
pub async fn get_price_range_statistics(
    State(reports): State<Reports>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<PriceRangeReport>, Error> {
    let month = MonthFilter::parse(query.month.as_deref())?;

    reports
        .price_histogram(month)
        .inspect_err(|error| tracing::error!("could not compute price histogram: {error}"))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use time::{Month, macros::datetime};

    use crate::{
        MonthFilter, PaginationConfig, ReportService, TransactionStore, endpoints,
        test_utils::get_test_server,
        transaction::{get_test_store, sample_record},
    };

    use super::{PRICE_RANGES, count_prices_by_range};

    fn count_for(prices: &[f64], label: &str) -> u64 {
        count_prices_by_range(prices)
            .into_iter()
            .find(|range_count| range_count.range == label)
            .map(|range_count| range_count.count)
            .unwrap()
    }

    #[test]
    fn returns_every_range_in_order_when_empty() {
        let got = count_prices_by_range(&[]);

        let labels: Vec<&str> = got.iter().map(|count| count.range.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "0-100", "101-200", "201-300", "301-400", "401-500", "501-600", "601-700",
                "701-800", "801-900", "901+"
            ]
        );
        assert!(got.iter().all(|count| count.count == 0));
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        assert_eq!(count_for(&[0.0], "0-100"), 1);
        assert_eq!(count_for(&[100.0], "0-100"), 1);
        assert_eq!(count_for(&[101.0], "101-200"), 1);
        assert_eq!(count_for(&[200.0], "101-200"), 1);
        assert_eq!(count_for(&[900.0], "801-900"), 1);
        assert_eq!(count_for(&[901.0], "901+"), 1);
        assert_eq!(count_for(&[1_000_000.0], "901+"), 1);
    }

    #[test]
    fn prices_between_ranges_count_towards_lower_range() {
        assert_eq!(count_for(&[100.5], "0-100"), 1);
        assert_eq!(count_for(&[900.99], "801-900"), 1);
    }

    #[test]
    fn negative_prices_count_towards_first_range() {
        assert_eq!(count_for(&[-5.0], "0-100"), 1);
    }

    #[test]
    fn counts_sum_to_number_of_prices() {
        let prices = [
            0.0, 15.99, 100.0, 100.5, 101.0, 299.0, 350.0, 480.5, 512.0, 700.0, 799.99, 850.0,
            901.0, 9999.0,
        ];

        let got = count_prices_by_range(&prices);

        assert_eq!(got.len(), PRICE_RANGES.len());
        assert_eq!(
            got.iter().map(|count| count.count).sum::<u64>(),
            prices.len() as u64
        );
    }

    #[test]
    fn price_histogram_only_counts_transactions_in_month() {
        let store = get_test_store();
        store
            .insert_all(&[
                sample_record(1, "A", 50.0, datetime!(2024-03-05 0:00 UTC)),
                sample_record(2, "B", 150.0, datetime!(2024-03-10 0:00 UTC)),
                sample_record(3, "C", 150.0, datetime!(2024-04-10 0:00 UTC)),
            ])
            .unwrap();
        let reports = ReportService::new(store, PaginationConfig::default());

        let got = reports
            .price_histogram(Some(MonthFilter::new(Month::March)))
            .unwrap();

        assert_eq!(got.month, Some(MonthFilter::new(Month::March)));
        for range_count in got.price_range_statistics {
            let want = match range_count.range.as_str() {
                "0-100" | "101-200" => 1,
                _ => 0,
            };
            assert_eq!(range_count.count, want, "range {}", range_count.range);
        }
    }

    #[tokio::test]
    async fn price_range_endpoint_echoes_month() {
        let server = get_test_server(&[sample_record(
            1,
            "A",
            50.0,
            datetime!(2024-03-05 0:00 UTC),
        )]);

        let response = server
            .get(endpoints::PRICE_RANGE_STATISTICS)
            .add_query_param("month", 3)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["month"], 3);
        assert_eq!(body["priceRangeStatistics"][0]["range"], "0-100");
        assert_eq!(body["priceRangeStatistics"][0]["count"], 1);
        assert_eq!(body["priceRangeStatistics"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn price_range_endpoint_omits_month_when_not_given() {
        let server = get_test_server(&[]);

        let response = server.get(endpoints::PRICE_RANGE_STATISTICS).await;

        response.assert_status_ok();
        assert!(response.json::<Value>().get("month").is_none());
    }

    #[tokio::test]
    async fn price_range_endpoint_rejects_invalid_month() {
        let server = get_test_server(&[]);

        for month in ["0", "13", "-4"] {
            server
                .get(endpoints::PRICE_RANGE_STATISTICS)
                .add_query_param("month", month)
                .await
                .assert_status_bad_request();
        }
    }
}
