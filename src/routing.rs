//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    report::{
        get_category_pie_chart, get_combined_data, get_price_range_statistics, get_statistics,
        get_transactions,
    },
    seed::get_seed_db,
};

/// Return a router with all the app's routes.
///
/// Unknown paths, and known paths requested with an unsupported method, get a
/// JSON 404 response. Every route allows cross-origin requests so that a
/// separately hosted dashboard frontend can call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SEED_DB, get(get_seed_db))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics))
        .route(
            endpoints::PRICE_RANGE_STATISTICS,
            get(get_price_range_statistics),
        )
        .route(endpoints::CATEGORY_PIE_CHART, get(get_category_pie_chart))
        .route(endpoints::COMBINED_DATA, get(get_combined_data))
        .method_not_allowed_fallback(get_404_not_found)
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
