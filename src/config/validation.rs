//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a fully layered [`Config`] for
//! values that would make the proxy unusable: a malformed or non-HTTP
//! upstream base URL, a zero timeout, or a zero body limit. All
//! problems are collected and returned together as
//! [`ValidationError`] values with per-field suggestions.

use url::Url;

use super::model::{Config, DEFAULT_BASE_URL};
use crate::error::ValidationError;

/// Validate the upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    let Ok(parsed) = Url::parse(url) else {
        return Err(format!("'{url}' is not a valid URL"));
    };
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(format!("'{url}' cannot be used as a base URL"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err("base URL must not carry a query string or fragment".into());
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_base_url(&config.upstream.base_url) {
        errors.push(ValidationError {
            field: "upstream.base_url".into(),
            message: msg,
            suggestion: Some(format!("the public API lives at {DEFAULT_BASE_URL}")),
        });
    }

    if config.upstream.timeout == 0 {
        errors.push(ValidationError {
            field: "upstream.timeout".into(),
            message: "timeout must be greater than 0 ms".into(),
            suggestion: Some("5000 is a sensible default".into()),
        });
    }

    if config.server.max_body == 0 {
        errors.push(ValidationError {
            field: "server.max_body".into(),
            message: "max_body must be greater than 0 bytes".into(),
            suggestion: None,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let lines = [
        format!("  listen:   {}:{}", config.server.host, config.server.port),
        format!("  upstream: {}", config.upstream.base_url),
        format!("  timeout:  {}ms", config.upstream.timeout),
        format!("  max body: {} bytes", config.server.max_body),
    ];
    format!("{} is valid\n{}", path, lines.join("\n"))
}
