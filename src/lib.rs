//! Sales Dashboard is a reporting API over a collection of sales transactions.
//!
//! This library provides a REST API that serves JSON reports: a paginated,
//! searchable transaction listing, monthly sales statistics, a price-range
//! histogram and a category histogram. Transactions are loaded once from a
//! remote JSON feed into a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod logging;
mod month;
mod not_found;
mod pagination;
mod report;
mod routing;
mod seed;
#[cfg(test)]
mod test_utils;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthFilter;
pub use pagination::{Page, PaginationConfig};
pub use report::{
    CategoryReport, CombinedReport, ListingQuery, ListingReport, PriceRangeReport, RangeCount,
    ReportService, SummaryReport,
};
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, parse_seed_feed};
pub use transaction::{
    CategoryCount, SQLiteTransactionStore, TransactionFilter, TransactionRecord, TransactionStore,
};

use crate::not_found::get_404_not_found_response;

/// The message sent to the client when the `month` query parameter is invalid.
pub const INVALID_MONTH_MESSAGE: &str =
    "Invalid month input. Please provide a number between 1 and 12.";

/// The message sent to the client when `page` or `perPage` is not a whole number.
pub const INVALID_PAGE_MESSAGE: &str =
    "Invalid page input. Please provide page and perPage as whole numbers.";

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The `month` query parameter was present but was not a whole number
    /// between 1 and 12.
    ///
    /// Callers should pass in the raw parameter value.
    #[error("invalid month \"{0}\", expected a number between 1 and 12")]
    InvalidMonth(String),

    /// The `page` or `perPage` query parameter was not a non-negative whole number.
    ///
    /// Holds the extractor's description of the problem for logging.
    #[error("invalid pagination parameters: {0}")]
    InvalidPage(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The seed feed could not be downloaded.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not fetch the seed feed: {0}")]
    SeedFetchError(String),

    /// The seed feed was not a JSON array of complete transaction records.
    #[error("invalid seed data: {0}")]
    InvalidSeedData(String),

    /// A background task running a database query panicked or was cancelled.
    #[error("a background task failed: {0}")]
    TaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidMonth(month) => {
                tracing::debug!("rejected invalid month {month:?}");
                (StatusCode::BAD_REQUEST, Json(INVALID_MONTH_MESSAGE)).into_response()
            }
            Error::InvalidPage(reason) => {
                tracing::debug!("rejected invalid pagination parameters: {reason}");
                (StatusCode::BAD_REQUEST, Json(INVALID_PAGE_MESSAGE)).into_response()
            }
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json("An unexpected error occurred, check the server logs for more details."),
                )
                    .into_response()
            }
        }
    }
}
