//! Outbound client for the public Pokémon REST API.
//!
//! [`PokeApiClient`] issues single `GET` requests (no retries) over the
//! shared pooled [`HttpClient`] and classifies every outcome into an
//! [`UpstreamError`]. Sending the request and collecting the full body
//! both happen under one `tokio::time::timeout`; when the deadline fires
//! the in-flight future is dropped, which aborts the request.

mod error;
pub mod model;

use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use http::header::{ACCEPT, USER_AGENT};
use http::{Method, StatusCode};
use url::Url;

use crate::server::HttpClient;

pub use error::{BoxError, UpstreamError, UpstreamErrorKind};
pub use model::{NamedResource, PokemonListResponse};

const AGENT: &str = concat!("pokeproxy/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct PokeApiClient {
    http: HttpClient,
    base_url: Url,
    timeout: Duration,
}

/// `.` or `..`, which a URL path cannot carry as a literal segment.
#[must_use]
fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Lowercase and trim a user supplied name or numeric id.
#[must_use]
pub fn normalize_identifier(name_or_id: &str) -> String {
    name_or_id.trim().to_lowercase()
}

impl PokeApiClient {
    #[must_use]
    pub const fn new(http: HttpClient, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `{base}/pokemon/{name_or_id}` with the identifier percent-encoded.
    ///
    /// Dot segments would be collapsed by the URL parser and resolve to a
    /// different resource, so they are reported as [`UpstreamError::NotFound`].
    pub fn entity_url(&self, name_or_id: &str) -> Result<Url, UpstreamError> {
        if is_dot_segment(name_or_id) {
            return Err(UpstreamError::NotFound);
        }
        self.resource_url(&["pokemon", name_or_id])
    }

    /// `{base}/pokemon?limit=..&offset=..`
    pub fn list_url(&self, limit: u32, offset: u64) -> Result<Url, UpstreamError> {
        let mut url = self.resource_url(&["pokemon"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }

    fn resource_url(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::network(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch one entity by name or id and return its JSON body untouched.
    ///
    /// The body is checked to be well-formed JSON but never re-serialized,
    /// so the caller can forward it byte for byte.
    pub async fn fetch_entity(&self, name_or_id: &str) -> Result<Bytes, UpstreamError> {
        let normalized = normalize_identifier(name_or_id);
        let url = self.entity_url(&normalized)?;
        let (status, body) = self.get(&url).await?;

        if status.is_success() {
            serde_json::from_slice::<serde::de::IgnoredAny>(&body)
                .map_err(|source| UpstreamError::Parse { source })?;
            return Ok(body);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }

        Err(UpstreamError::Status(status))
    }

    /// Fetch one page of the listing endpoint.
    pub async fn fetch_list(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<PokemonListResponse, UpstreamError> {
        let url = self.list_url(limit, offset)?;
        let (status, body) = self.get(&url).await?;

        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        serde_json::from_slice(&body).map_err(|source| UpstreamError::Parse { source })
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn get(&self, url: &Url) -> Result<(StatusCode, Bytes), UpstreamError> {
        let uri: hyper::Uri = url.as_str().parse().map_err(UpstreamError::network)?;
        let req = hyper::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, AGENT)
            .body(Full::new(Bytes::new()))
            .map_err(UpstreamError::network)?;

        let start = Instant::now();
        let exchange = async {
            let response = self
                .http
                .request(req)
                .await
                .map_err(UpstreamError::network)?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(UpstreamError::network)?
                .to_bytes();
            Ok::<_, UpstreamError>((status, body))
        };

        let result = tokio::time::timeout(self.timeout, exchange)
            .await
            .unwrap_or(Err(UpstreamError::Timeout(self.timeout)));
        let latency_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok((status, _)) => tracing::debug!(
                url = %url,
                status = status.as_u16(),
                latency_ms,
                "upstream responded"
            ),
            Err(e) => tracing::warn!(
                url = %url,
                error = %e,
                latency_ms,
                "upstream request failed"
            ),
        }

        result
    }
}
