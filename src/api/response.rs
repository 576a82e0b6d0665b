//! Uniform JSON responses with permissive CORS headers.
//!
//! Every response the API produces goes through this module: success
//! payloads via [`send_json`] / [`send_raw_json`], failures via
//! [`send_error`] (wrapped in an [`ErrorEnvelope`]) and `OPTIONS`
//! requests via [`cors_preflight`].

use axum::body::Body;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                status_code: status.as_u16(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}

/// Send an already-encoded JSON document as is.
#[must_use]
pub fn send_raw_json(status: StatusCode, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    apply_cors(headers);
    response
}

/// Serialize `data` as the response body, or send an empty body when absent.
pub fn send_json<T: Serialize>(status: StatusCode, data: Option<&T>) -> Response {
    let Some(data) = data else {
        return send_raw_json(status, Bytes::new());
    };

    match serde_json::to_vec(data) {
        Ok(encoded) => send_raw_json(status, Bytes::from(encoded)),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response payload");
            let fallback = ErrorEnvelope::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                super::MSG_INTERNAL_ERROR,
            );
            // The envelope is plain strings and integers, it always serializes.
            let encoded = serde_json::to_vec(&fallback).unwrap_or_default();
            send_raw_json(StatusCode::INTERNAL_SERVER_ERROR, Bytes::from(encoded))
        }
    }
}

/// Wrap `message` in an [`ErrorEnvelope`] stamped with the current time.
#[must_use]
pub fn send_error(status: StatusCode, message: &str) -> Response {
    send_json(status, Some(&ErrorEnvelope::new(status, message)))
}

/// `200` with no body and the CORS headers, for `OPTIONS` requests.
#[must_use]
pub fn cors_preflight() -> Response {
    let mut response = Response::new(Body::empty());
    apply_cors(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn error_envelope_mirrors_status() {
        let response = send_error(StatusCode::NOT_FOUND, "missing");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);

        let envelope: ErrorEnvelope = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(envelope.error.message, "missing");
        assert_eq!(envelope.error.status_code, 404);
        assert!(chrono::DateTime::parse_from_rfc3339(&envelope.error.timestamp).is_ok());
        assert!(envelope.error.timestamp.ends_with('Z'));
    }

    #[test]
    fn envelope_uses_camel_case_keys() {
        let value = serde_json::to_value(ErrorEnvelope::new(StatusCode::OK, "ok")).unwrap();
        assert_eq!(value["error"]["statusCode"], 200);
        assert!(value["error"].get("status_code").is_none());
    }

    #[tokio::test]
    async fn absent_payload_sends_empty_body() {
        let response = send_json::<()>(StatusCode::OK, None);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn preflight_has_cors_headers_and_no_body() {
        let response = cors_preflight();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert!(response.headers().get(CONTENT_TYPE).is_none());
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn raw_json_is_forwarded_byte_for_byte() {
        let raw = Bytes::from_static(br#"{"b":1,"a":2}"#);
        let response = send_raw_json(StatusCode::OK, raw.clone());
        assert_eq!(body_bytes(response).await, raw);
    }
}
