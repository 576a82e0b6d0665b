//! Request dispatch for the JSON API.
//!
//! [`dispatch`] is the Axum fallback that receives every request and
//! resolves it to exactly one response, in order: `OPTIONS` preflight,
//! `GET /api/health`, the pokemon routes, then a 404 envelope.
//! Submodules handle the listing and detail routes ([`pokemon`]), query
//! parsing and page shaping ([`pagination`]) and response formatting
//! ([`response`]).

pub mod pagination;
pub mod pokemon;
pub mod response;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::health;
use crate::server::AppState;

pub use crate::middleware::CORRELATION_HEADER;

pub const MSG_ROUTE_NOT_FOUND: &str = "Ruta no encontrada en la API Pok\u{e9}mon";
pub const MSG_INTERNAL_ERROR: &str = "Error interno del servidor";

/// A client-facing failure: the status line and the envelope message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, MSG_ROUTE_NOT_FOUND)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        response::send_error(self.status, &self.message)
    }
}

pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
) -> Response {
    let path = uri.path();
    let correlation_id = req_headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info!(
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
        "request received"
    );

    let response = if method == Method::OPTIONS {
        response::cors_preflight()
    } else if method == Method::GET && path == health::HEALTH_PATH {
        health::health_handler()
    } else if let Some(response) = pokemon::handle(&state, &method, path, uri.query()).await {
        response
    } else {
        tracing::warn!(
            correlation_id = %correlation_id,
            method = %method,
            path = %path,
            "no route matched"
        );
        ApiError::not_found().into_response()
    };

    tracing::info!(
        correlation_id = %correlation_id,
        status = response.status().as_u16(),
        "request completed"
    );

    response
}
