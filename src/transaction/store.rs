//! Defines the transaction store trait and its SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{Error, pagination::Page};

use super::{TransactionFilter, TransactionRecord, map_transaction_row};

/// The number of transactions in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category label.
    pub category: String,
    /// How many transactions have this category.
    pub count: u64,
}

/// Handles the storage, retrieval and aggregation of transactions.
pub trait TransactionStore {
    /// Add every record in `records` to the store, returning how many were added.
    ///
    /// Either every record is added or none are. Records are not deduplicated.
    fn insert_all(&self, records: &[TransactionRecord]) -> Result<usize, Error>;

    /// Retrieve the transactions matching `filter` in the order they were
    /// added, optionally restricted to a `page` of results.
    fn find(
        &self,
        filter: &TransactionFilter,
        page: Option<Page>,
    ) -> Result<Vec<TransactionRecord>, Error>;

    /// Count the transactions matching `filter`.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error>;

    /// Count the transactions matching `filter` that did (or did not) sell.
    fn count_sold(&self, filter: &TransactionFilter, sold: bool) -> Result<u64, Error> {
        self.count(&filter.clone().with_sold(sold))
    }

    /// Sum the price of the transactions matching `filter`, zero if none match.
    fn sum_price(&self, filter: &TransactionFilter) -> Result<f64, Error>;

    /// Get the price of every transaction matching `filter`.
    fn prices(&self, filter: &TransactionFilter) -> Result<Vec<f64>, Error>;

    /// Count the transactions matching `filter` in each category, in the
    /// order each category first appears.
    fn count_by_category(&self, filter: &TransactionFilter) -> Result<Vec<CategoryCount>, Error>;
}

/// Stores transactions in a SQLite database.
///
/// The `sale_transaction` table must be set up with [crate::initialize_db]
/// before the store is used.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Insert `records` in a single database transaction.
    ///
    /// Sale dates are stored in UTC so that month filtering matches the UTC
    /// calendar month.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if any insert fails, in which case no
    /// records are stored.
    fn insert_all(&self, records: &[TransactionRecord]) -> Result<usize, Error> {
        let mut connection = self.lock()?;
        let tx = connection.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO sale_transaction
                    (id, title, price, description, category, image, sold, date_of_sale)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for record in records {
                stmt.execute((
                    record.id,
                    &record.title,
                    record.price,
                    &record.description,
                    &record.category,
                    &record.image,
                    record.sold,
                    record.date_of_sale.to_offset(UtcOffset::UTC),
                ))?;
            }
        }

        tx.commit()?;
        tracing::debug!("inserted {} transactions", records.len());

        Ok(records.len())
    }

    /// Query for transactions in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn find(
        &self,
        filter: &TransactionFilter,
        page: Option<Page>,
    ) -> Result<Vec<TransactionRecord>, Error> {
        let (where_clause, query_parameters) = filter.where_clause();

        let mut query_string_parts = vec![
            "SELECT id, title, price, description, category, image, sold, date_of_sale \
            FROM sale_transaction"
                .to_string(),
            where_clause,
            "ORDER BY row_id ASC".to_string(),
        ];

        if let Some(page) = page {
            query_string_parts.push(format!(
                "LIMIT {} OFFSET {}",
                to_sql_integer(page.limit),
                to_sql_integer(page.offset)
            ));
        }

        let query_string = query_string_parts.join(" ");
        tracing::debug!("finding transactions with query {query_string:?}");

        let connection = self.lock()?;
        let mut stmt = connection.prepare(&query_string)?;
        let records = stmt
            .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        Ok(records)
    }

    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error> {
        let (where_clause, query_parameters) = filter.where_clause();
        let query_string = format!("SELECT COUNT(*) FROM sale_transaction {where_clause}");

        let count: i64 = self.lock()?.query_row(
            &query_string,
            params_from_iter(query_parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(count.max(0) as u64)
    }

    fn sum_price(&self, filter: &TransactionFilter) -> Result<f64, Error> {
        let (where_clause, query_parameters) = filter.where_clause();
        let query_string =
            format!("SELECT COALESCE(SUM(price), 0.0) FROM sale_transaction {where_clause}");

        let total = self.lock()?.query_row(
            &query_string,
            params_from_iter(query_parameters.iter()),
            |row| row.get(0),
        )?;

        Ok(total)
    }

    fn prices(&self, filter: &TransactionFilter) -> Result<Vec<f64>, Error> {
        let (where_clause, query_parameters) = filter.where_clause();
        let query_string =
            format!("SELECT price FROM sale_transaction {where_clause} ORDER BY row_id ASC");

        let connection = self.lock()?;
        let mut stmt = connection.prepare(&query_string)?;
        let prices = stmt
            .query_map(params_from_iter(query_parameters.iter()), |row| row.get(0))?
            .collect::<Result<Vec<f64>, rusqlite::Error>>()?;

        Ok(prices)
    }

    fn count_by_category(&self, filter: &TransactionFilter) -> Result<Vec<CategoryCount>, Error> {
        let (where_clause, query_parameters) = filter.where_clause();
        // Order by the first row of each group to keep categories in the order they were added.
        let query_string = format!(
            "SELECT category, COUNT(*) FROM sale_transaction {where_clause} \
            GROUP BY category ORDER BY MIN(row_id) ASC"
        );

        let connection = self.lock()?;
        let mut stmt = connection.prepare(&query_string)?;
        let counts = stmt
            .query_map(params_from_iter(query_parameters.iter()), |row| {
                let count: i64 = row.get(1)?;

                Ok(CategoryCount {
                    category: row.get(0)?,
                    count: count.max(0) as u64,
                })
            })?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        Ok(counts)
    }
}

#[cfg(test)]
impl SQLiteTransactionStore {
    /// Panic while holding the connection lock so that every later query fails.
    pub(crate) fn poison_lock(&self) {
        let connection = self.connection.clone();
        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poisoning the connection lock");
        })
        .join();
    }
}

/// SQLite integers are signed 64-bit, so clamp anything larger.
fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::datetime};

    use crate::{
        MonthFilter,
        pagination::Page,
        transaction::{TransactionFilter, get_test_store, sample_record},
    };

    use super::{CategoryCount, TransactionStore};

    #[test]
    fn find_returns_records_in_insertion_order() {
        let store = get_test_store();
        let records = vec![
            sample_record(3, "Zip hoodie", 45.0, datetime!(2022-01-10 10:00 UTC)),
            sample_record(1, "Anchor bracelet", 12.5, datetime!(2021-07-01 09:30 UTC)),
            sample_record(2, "Monitor", 599.99, datetime!(2022-03-15 18:45 UTC)),
        ];

        let inserted = store.insert_all(&records).unwrap();
        let got = store.find(&TransactionFilter::default(), None).unwrap();

        assert_eq!(inserted, 3);
        assert_eq!(got, records);
    }

    #[test]
    fn insert_all_keeps_duplicate_ids() {
        let store = get_test_store();
        let records = vec![sample_record(1, "Mug", 8.0, datetime!(2022-02-02 0:00 UTC))];

        store.insert_all(&records).unwrap();
        store.insert_all(&records).unwrap();

        assert_eq!(store.count(&TransactionFilter::default()).unwrap(), 2);
    }

    #[test]
    fn month_filter_ignores_year() {
        let store = get_test_store();
        store
            .insert_all(&[
                sample_record(1, "A", 10.0, datetime!(2021-03-05 0:00 UTC)),
                sample_record(2, "B", 20.0, datetime!(2022-03-28 12:00 UTC)),
                sample_record(3, "C", 30.0, datetime!(2022-04-01 0:00 UTC)),
            ])
            .unwrap();

        let filter = TransactionFilter::for_month(Some(MonthFilter::new(Month::March)));
        let got = store.find(&filter, None).unwrap();

        let ids: Vec<i64> = got.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn month_filter_uses_utc_calendar_month() {
        let store = get_test_store();
        // 2024-04-01 01:00 in UTC.
        store
            .insert_all(&[sample_record(1, "A", 10.0, datetime!(2024-03-31 23:00 -2:00))])
            .unwrap();

        let march = TransactionFilter::for_month(Some(MonthFilter::new(Month::March)));
        let april = TransactionFilter::for_month(Some(MonthFilter::new(Month::April)));

        assert_eq!(store.count(&march).unwrap(), 0);
        assert_eq!(store.count(&april).unwrap(), 1);
    }

    #[test]
    fn text_filter_matches_title_or_description_ignoring_case() {
        let store = get_test_store();
        let mut described = sample_record(2, "Charger", 25.0, datetime!(2022-01-01 0:00 UTC));
        described.description = "Works with any PHONE".to_owned();
        store
            .insert_all(&[
                sample_record(1, "Smartphone case", 15.0, datetime!(2022-01-01 0:00 UTC)),
                described,
                sample_record(3, "Laptop", 900.0, datetime!(2022-01-01 0:00 UTC)),
            ])
            .unwrap();

        let filter = TransactionFilter {
            text: Some("Phone".to_owned()),
            ..Default::default()
        };
        let got = store.find(&filter, None).unwrap();

        let ids: Vec<i64> = got.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn text_filter_ignores_case_of_non_ascii_letters() {
        let store = get_test_store();
        let mut described = sample_record(2, "Scarf", 30.0, datetime!(2022-01-01 0:00 UTC));
        described.description = "Tricot ÉPAIS".to_owned();
        store
            .insert_all(&[
                sample_record(1, "ÉCHARPE en laine", 45.0, datetime!(2022-01-01 0:00 UTC)),
                described,
            ])
            .unwrap();

        for (text, want) in [("écharpe", 1), ("ÉcHaRpE", 1), ("en LAINE", 1), ("épais", 1)] {
            let filter = TransactionFilter {
                text: Some(text.to_owned()),
                ..Default::default()
            };

            assert_eq!(store.count(&filter).unwrap(), want, "search {text:?}");
        }
    }

    #[test]
    fn text_filter_treats_wildcards_literally() {
        let store = get_test_store();
        store
            .insert_all(&[
                sample_record(1, "50% off jacket", 50.0, datetime!(2022-01-01 0:00 UTC)),
                sample_record(2, "500 thread sheets", 80.0, datetime!(2022-01-01 0:00 UTC)),
            ])
            .unwrap();

        let filter = TransactionFilter {
            text: Some("50%".to_owned()),
            ..Default::default()
        };

        assert_eq!(store.count(&filter).unwrap(), 1);
    }

    #[test]
    fn price_filter_is_combined_with_text_filter() {
        let store = get_test_store();
        store
            .insert_all(&[
                sample_record(1, "Pack of 100 pens", 100.0, datetime!(2022-01-01 0:00 UTC)),
                sample_record(2, "Pack of 100 pencils", 4.0, datetime!(2022-01-01 0:00 UTC)),
                sample_record(3, "Stapler", 100.0, datetime!(2022-01-01 0:00 UTC)),
            ])
            .unwrap();

        let filter = TransactionFilter {
            text: Some("100".to_owned()),
            price: Some(100.0),
            ..Default::default()
        };
        let got = store.find(&filter, None).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, 1);
    }

    #[test]
    fn find_pages_through_results() {
        let store = get_test_store();
        let records: Vec<_> = (1..=5)
            .map(|id| sample_record(id, "Item", id as f64, datetime!(2022-01-01 0:00 UTC)))
            .collect();
        store.insert_all(&records).unwrap();

        let got = store
            .find(&TransactionFilter::default(), Some(Page::new(2, 2)))
            .unwrap();

        let ids: Vec<i64> = got.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn find_past_last_page_is_empty() {
        let store = get_test_store();
        store
            .insert_all(&[sample_record(1, "Item", 1.0, datetime!(2022-01-01 0:00 UTC))])
            .unwrap();

        let got = store
            .find(&TransactionFilter::default(), Some(Page::new(u64::MAX, 10)))
            .unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn sum_price_of_no_transactions_is_zero() {
        let store = get_test_store();

        assert_eq!(store.sum_price(&TransactionFilter::default()).unwrap(), 0.0);
    }

    #[test]
    fn sum_price_and_sold_counts_respect_filter() {
        let store = get_test_store();
        let mut unsold = sample_record(2, "B", 150.0, datetime!(2024-03-10 0:00 UTC));
        unsold.sold = false;
        store
            .insert_all(&[
                sample_record(1, "A", 50.0, datetime!(2024-03-05 0:00 UTC)),
                unsold,
                sample_record(3, "C", 999.0, datetime!(2024-05-05 0:00 UTC)),
            ])
            .unwrap();

        let march = TransactionFilter::for_month(Some(MonthFilter::new(Month::March)));

        assert_eq!(store.sum_price(&march).unwrap(), 200.0);
        assert_eq!(store.count_sold(&march, true).unwrap(), 1);
        assert_eq!(store.count_sold(&march, false).unwrap(), 1);
        assert_eq!(
            store.count_sold(&TransactionFilter::default(), true).unwrap(),
            2
        );
    }

    #[test]
    fn prices_returns_every_matching_price() {
        let store = get_test_store();
        store
            .insert_all(&[
                sample_record(1, "A", 5.0, datetime!(2022-01-01 0:00 UTC)),
                sample_record(2, "B", 250.5, datetime!(2022-01-01 0:00 UTC)),
            ])
            .unwrap();

        let got = store.prices(&TransactionFilter::default()).unwrap();

        assert_eq!(got, vec![5.0, 250.5]);
    }

    #[test]
    fn count_by_category_orders_by_first_appearance() {
        let store = get_test_store();
        let mut records = vec![];
        for (id, category) in ["electronics", "jewelery", "electronics", "clothing"]
            .iter()
            .enumerate()
        {
            let mut record = sample_record(id as i64, "Item", 10.0, datetime!(2022-01-01 0:00 UTC));
            record.category = category.to_string();
            records.push(record);
        }
        store.insert_all(&records).unwrap();

        let got = store.count_by_category(&TransactionFilter::default()).unwrap();

        assert_eq!(
            got,
            vec![
                CategoryCount {
                    category: "electronics".to_owned(),
                    count: 2
                },
                CategoryCount {
                    category: "jewelery".to_owned(),
                    count: 1
                },
                CategoryCount {
                    category: "clothing".to_owned(),
                    count: 1
                },
            ]
        );
    }
}
