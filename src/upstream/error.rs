//! Failure outcomes of an upstream call.
//!
//! Every variant maps to the HTTP status code the route handlers mirror
//! back to the caller, see [`UpstreamError::status_code`].

use std::time::Duration;

use hyper::StatusCode;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    NotFound,
    Status,
    Parse,
    Network,
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("resource not found upstream")]
    NotFound,

    #[error("upstream responded with status {0}")]
    Status(StatusCode),

    #[error("failed to parse upstream response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("network error reaching upstream: {source}")]
    Network {
        #[source]
        source: BoxError,
    },

    #[error("upstream did not respond within {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl UpstreamError {
    pub(crate) fn network(source: impl Into<BoxError>) -> Self {
        Self::Network {
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> UpstreamErrorKind {
        match self {
            Self::NotFound => UpstreamErrorKind::NotFound,
            Self::Status(_) => UpstreamErrorKind::Status,
            Self::Parse { .. } => UpstreamErrorKind::Parse,
            Self::Network { .. } => UpstreamErrorKind::Network,
            Self::Timeout(_) => UpstreamErrorKind::Timeout,
        }
    }

    /// Status code the client-facing response should carry.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Status(status) => *status,
            Self::Parse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Network { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
