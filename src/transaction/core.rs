//! Defines the core data model and table for sales transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// A product listing and whether it sold.
///
/// Records are created in bulk by seeding and are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The ID supplied by the seed feed.
    ///
    /// This is not guaranteed to be unique, seeding twice will store each ID twice.
    pub id: i64,
    /// The product name.
    pub title: String,
    /// The listed price of the product.
    pub price: f64,
    /// A text description of the product.
    pub description: String,
    /// A free-form category label, e.g. "electronics".
    pub category: String,
    /// The URI of the product image.
    pub image: String,
    /// Whether the product sold.
    pub sold: bool,
    /// When the product was sold, or listed for sale if it did not sell.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

/// Create the table for sales transactions.
///
/// `row_id` is owned by the store and only used to keep results in insertion order.
///
/// # Errors
/// Returns an [Error::SqlError] if the SQL query fails.
pub fn create_transaction_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale_transaction (
            row_id INTEGER PRIMARY KEY,
            id INTEGER NOT NULL,
            title TEXT NOT NULL,
            price REAL NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            image TEXT NOT NULL,
            sold INTEGER NOT NULL,
            date_of_sale TEXT NOT NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_sale_transaction_category ON sale_transaction(category)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [TransactionRecord].
///
/// The row must contain the columns `id, title, price, description, category,
/// image, sold, date_of_sale` in that order.
pub fn map_transaction_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        image: row.get(5)?,
        sold: row.get(6)?,
        date_of_sale: row.get(7)?,
    })
}
