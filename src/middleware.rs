//! Tower middleware shared by every route.
//!
//! [`correlation_id`] runs outside the panic boundary so that every
//! response, including the 500 produced for an unhandled fault, carries
//! the `x-correlation-id` header.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Reuse the caller's correlation id or mint a v4 UUID, expose it to the
/// handler as a request header, and echo it on the response.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let value = req
        .headers()
        .get(CORRELATION_HEADER)
        .filter(|v| v.to_str().is_ok())
        .cloned()
        .or_else(|| HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()).ok());

    if let Some(ref value) = value {
        req.headers_mut().insert(CORRELATION_HEADER, value.clone());
    }

    let mut response = next.run(req).await;

    if let Some(value) = value {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}
