use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::db::initialize;

use super::{SQLiteTransactionStore, TransactionRecord};

pub(crate) fn get_test_store() -> SQLiteTransactionStore {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&conn).expect("Could not initialize database.");

    SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)))
}

/// A sold transaction in the "electronics" category.
pub(crate) fn sample_record(
    id: i64,
    title: &str,
    price: f64,
    date_of_sale: OffsetDateTime,
) -> TransactionRecord {
    TransactionRecord {
        id,
        title: title.to_owned(),
        price,
        description: format!("Description of {title}"),
        category: "electronics".to_owned(),
        image: format!("https://example.com/images/{id}.jpg"),
        sold: true,
        date_of_sale,
    }
}
