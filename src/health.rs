//! `GET /api/health` endpoint handler.
//!
//! The health check answers with the same envelope shape used for
//! errors (`{ "error": { message, statusCode: 200, timestamp } }`). API
//! consumers already depend on that shape, so it is kept as is.

use axum::http::StatusCode;
use axum::response::Response;

use crate::api::response::send_error;

pub const HEALTH_PATH: &str = "/api/health";
pub const HEALTH_MESSAGE: &str = "API Pok\u{e9}mon funcionando correctamente";

#[must_use]
pub fn health_handler() -> Response {
    send_error(StatusCode::OK, HEALTH_MESSAGE)
}
