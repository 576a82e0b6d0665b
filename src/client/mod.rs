//! HTTP client for talking to a running pokeproxy instance.
//!
//! Used by the `health`, `search` and `list` subcommands. Non-2xx
//! answers are turned into [`PokeProxyError::Api`] carrying the
//! envelope message when the body has one.

pub mod cache;

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;
use serde::de::DeserializeOwned;

use crate::api::pagination::PokemonListPage;
use crate::api::response::ErrorEnvelope;
use crate::error::PokeProxyError;
use crate::server::{build_http_client, HttpClient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: build_http_client(Duration::from_secs(30)),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}{path}` and return the status with the full body.
    pub async fn get(&self, path_and_query: &str) -> Result<(StatusCode, Bytes), PokeProxyError> {
        let url = format!("{}{path_and_query}", self.base_url);
        let uri: hyper::Uri =
            url.parse().map_err(
                |e: hyper::http::uri::InvalidUri| PokeProxyError::UriParse {
                    source: Box::new(e),
                },
            )?;

        let req = hyper::Request::builder()
            .uri(uri)
            .header(hyper::header::ACCEPT, "application/json")
            .body(Full::new(Bytes::new()))
            .map_err(|e| PokeProxyError::HttpRequest {
                source: Box::new(e),
            })?;

        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.http.request(req))
            .await
            .map_err(|_| PokeProxyError::HttpRequest {
                source: format!("request timed out after {}s", REQUEST_TIMEOUT.as_secs()).into(),
            })?
            .map_err(|e| PokeProxyError::HttpRequest {
                source: Box::new(e),
            })?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| PokeProxyError::HttpRequest {
                source: Box::new(e),
            })?
            .to_bytes();

        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, PokeProxyError> {
        let (status, body) = self.get(path_and_query).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        serde_json::from_slice(&body).map_err(|source| PokeProxyError::ResponseParse { source })
    }

    /// Detail document for one name or id, as served by the proxy.
    pub async fn pokemon(&self, key: &str) -> Result<serde_json::Value, PokeProxyError> {
        self.get_json(&format!("/api/pokemon/{}", urlencoding::encode(key)))
            .await
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<PokemonListPage, PokeProxyError> {
        self.get_json(&format!("/api/pokemon?limit={limit}&page={page}"))
            .await
    }
}

fn api_error(status: StatusCode, body: &[u8]) -> PokeProxyError {
    let message = serde_json::from_slice::<ErrorEnvelope>(body).map_or_else(
        |_| String::from_utf8_lossy(body).into_owned(),
        |envelope| envelope.error.message,
    );
    PokeProxyError::Api { status, message }
}
