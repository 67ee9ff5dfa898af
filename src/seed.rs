//! Seeds the database with transactions from a remote JSON feed.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use crate::{AppState, Error, SQLiteTransactionStore, TransactionRecord, TransactionStore};

/// The public feed of product transactions used when no other URL is configured.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// One element of the seed feed.
///
/// Every field is required, a feed with a missing field is rejected as a whole.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedRecord {
    id: i64,
    title: String,
    price: f64,
    description: String,
    category: String,
    image: String,
    sold: bool,
    date_of_sale: String,
}

impl SeedRecord {
    fn into_transaction(self) -> Result<TransactionRecord, Error> {
        let date_of_sale = parse_date_of_sale(&self.date_of_sale)?;

        Ok(TransactionRecord {
            id: self.id,
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            sold: self.sold,
            date_of_sale,
        })
    }
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
fn parse_date_of_sale(text: &str) -> Result<OffsetDateTime, Error> {
    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time);
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc())
        .map_err(|error| Error::InvalidSeedData(format!("invalid dateOfSale {text:?}: {error}")))
}

/// Parse the seed feed, a JSON array of transactions.
///
/// # Errors
/// Returns [Error::InvalidSeedData] if the text is not a JSON array, if any
/// element is missing a field, or if any `dateOfSale` is not a valid date.
pub fn parse_seed_feed(text: &str) -> Result<Vec<TransactionRecord>, Error> {
    let seed_records: Vec<SeedRecord> =
        serde_json::from_str(text).map_err(|error| Error::InvalidSeedData(error.to_string()))?;

    seed_records
        .into_iter()
        .map(SeedRecord::into_transaction)
        .collect()
}

async fn fetch_seed_feed(client: &reqwest::Client, url: &str) -> Result<String, Error> {
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|error| Error::SeedFetchError(error.to_string()))?
        .text()
        .await
        .map_err(|error| Error::SeedFetchError(error.to_string()))
}

/// The state needed by the seed endpoint.
#[derive(Debug, Clone)]
pub struct SeedState {
    store: SQLiteTransactionStore,
    http_client: reqwest::Client,
    seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

async fn seed(state: SeedState) -> Result<usize, Error> {
    let text = fetch_seed_feed(&state.http_client, &state.seed_url).await?;
    let records = parse_seed_feed(&text)?;
    let store = state.store;

    tokio::task::spawn_blocking(move || store.insert_all(&records))
        .await
        .map_err(|error| Error::TaskFailed(error.to_string()))?
}

/// Route handler that copies every transaction in the seed feed into the store.
///
/// Seeding is not idempotent, calling this twice stores every transaction twice.
pub async fn get_seed_db(State(state): State<SeedState>) -> Response {
    let seed_url = state.seed_url.clone();

    match seed(state).await {
        Ok(inserted) => {
            tracing::info!("Seeded {inserted} transactions from {seed_url}");
            (StatusCode::OK, Json("Database initialized with seed data")).into_response()
        }
        Err(error) => {
            tracing::error!("Could not seed the database from {seed_url}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json("Error initializing database"),
            )
                .into_response()
        }
    }
}
