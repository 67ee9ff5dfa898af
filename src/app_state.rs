//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, SQLiteTransactionStore, db::initialize, pagination::PaginationConfig};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store holding every seeded transaction.
    pub store: SQLiteTransactionStore,

    /// The client used to download the seed feed.
    pub http_client: reqwest::Client,

    /// The URL of the JSON feed that `/seed-db` copies transactions from.
    pub seed_url: String,

    /// The config that controls how to return pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        seed_url: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            store: SQLiteTransactionStore::new(connection),
            http_client: reqwest::Client::new(),
            seed_url: seed_url.to_owned(),
            pagination_config,
        })
    }
}
