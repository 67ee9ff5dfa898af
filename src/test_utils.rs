#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, PaginationConfig, TransactionRecord, TransactionStore, build_router};

/// A seed URL that nothing listens on, for tests that never seed over HTTP.
pub(crate) const UNUSED_SEED_URL: &str = "http://127.0.0.1:9/unused.json";

pub(crate) fn get_test_state(seed_url: &str) -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(conn, seed_url, PaginationConfig::default())
        .expect("Could not create app state.")
}

/// Serve the full router over an in-memory database holding `records`.
pub(crate) fn get_test_server(records: &[TransactionRecord]) -> TestServer {
    let state = get_test_state(UNUSED_SEED_URL);
    state
        .store
        .insert_all(records)
        .expect("Could not insert test records.");

    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}
