//! The JSON response for unknown routes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

#[derive(Serialize)]
struct NotFoundBody {
    message: &'static str,
}

/// Route handler for paths and methods that have no other handler.
pub async fn get_404_not_found() -> Error {
    Error::NotFound
}

/// The response for [Error::NotFound], used by the fallback for unknown routes.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            message: "Route is not found",
        }),
    )
        .into_response()
}
