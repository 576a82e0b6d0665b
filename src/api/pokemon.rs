//! `/api/pokemon` (listing) and `/api/pokemon/{nameOrId}` (detail).
//!
//! [`handle`] claims `GET` requests under the `/api/pokemon` prefix and
//! returns `None` for anything else so the dispatcher can fall through.

use axum::http::{Method, StatusCode};
use axum::response::Response;

use super::pagination::{PageWindow, PokemonListPage};
use super::response::{send_json, send_raw_json};
use super::ApiError;
use crate::server::AppState;
use crate::upstream::UpstreamError;

pub const LIST_PATH: &str = "/api/pokemon";
const DETAIL_PREFIX: &str = "/api/pokemon/";

pub const MSG_LIST_FAILED: &str =
    "Error al obtener el listado de Pok\u{e9}mon. Int\u{e9}ntalo m\u{e1}s tarde.";
pub const MSG_MISSING_ID: &str =
    "Debes indicar el nombre o ID del Pok\u{e9}mon, por ejemplo /api/pokemon/pikachu";
pub const MSG_NOT_FOUND: &str = "Pok\u{e9}mon no encontrado. Verifica el nombre o ID.";
pub const MSG_DETAIL_FAILED: &str =
    "Error al obtener los datos del Pok\u{e9}mon. Int\u{e9}ntalo m\u{e1}s tarde.";

pub async fn handle(
    state: &AppState,
    method: &Method,
    path: &str,
    query: Option<&str>,
) -> Option<Response> {
    if method != Method::GET {
        return None;
    }

    let result = if path == LIST_PATH {
        list(state, query).await
    } else if let Some(rest) = path.strip_prefix(DETAIL_PREFIX) {
        let segment = rest.split('/').next().unwrap_or_default();
        detail(state, segment).await
    } else {
        return None;
    };

    Some(result.unwrap_or_else(axum::response::IntoResponse::into_response))
}

async fn list(state: &AppState, query: Option<&str>) -> Result<Response, ApiError> {
    let window = PageWindow::from_query(query);

    let upstream = state
        .pokeapi
        .fetch_list(window.limit, window.offset)
        .await
        .map_err(|e| {
            log_failure("listing", &e);
            ApiError::new(e.status_code(), MSG_LIST_FAILED)
        })?;

    let page = PokemonListPage::from_upstream(window, upstream);
    Ok(send_json(StatusCode::OK, Some(&page)))
}

async fn detail(state: &AppState, raw_segment: &str) -> Result<Response, ApiError> {
    let decoded = urlencoding::decode(raw_segment)
        .map_or_else(|_| raw_segment.to_string(), std::borrow::Cow::into_owned);

    // `/api/pokemon/.` names the collection itself and `/api/pokemon/..`
    // climbs out of it, as a normalizing URL parser would read them.
    match decoded.trim() {
        "" | "." => return Err(ApiError::new(StatusCode::BAD_REQUEST, MSG_MISSING_ID)),
        ".." => return Err(ApiError::not_found()),
        _ => {}
    }

    let body = state.pokeapi.fetch_entity(&decoded).await.map_err(|e| {
        log_failure("detail", &e);
        let message = if matches!(e, UpstreamError::NotFound) {
            MSG_NOT_FOUND
        } else {
            MSG_DETAIL_FAILED
        };
        ApiError::new(e.status_code(), message)
    })?;

    Ok(send_raw_json(StatusCode::OK, body))
}

fn log_failure(operation: &'static str, err: &UpstreamError) {
    tracing::warn!(
        operation,
        kind = ?err.kind(),
        status = err.status_code().as_u16(),
        error = %err,
        "upstream call failed"
    );
}
