//! Sales transactions and the store that holds them.
//!
//! This module contains:
//! - The `TransactionRecord` model and its SQLite table
//! - `TransactionFilter` for selecting records by month, search text, price and sold status
//! - The `TransactionStore` trait and its SQLite implementation

mod core;
mod query;
mod store;
#[cfg(test)]
mod test_utils;

pub use core::{TransactionRecord, create_transaction_table, map_transaction_row};
pub use query::TransactionFilter;
pub use store::{CategoryCount, SQLiteTransactionStore, TransactionStore};

#[cfg(test)]
pub(crate) use test_utils::{get_test_store, sample_record};
