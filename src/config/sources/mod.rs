//! File-backed config sources.
//!
//! [`create_file_source`] picks a [`FileSource`] deserializer from the
//! file extension (YAML, JSON and TOML, each gated by a feature flag).
//! [`parse_config_str`] is the synchronous equivalent used by
//! `pokeproxy validate`.

pub mod file_source;

use std::path::Path;

use crate::config::model::Config;
use crate::error::PokeProxyError;
use file_source::FileSource;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(feature = "yaml")]
fn from_yaml(content: &str) -> Result<Config, BoxError> {
    serde_yml::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

#[cfg(feature = "json")]
fn from_json(content: &str) -> Result<Config, BoxError> {
    serde_json::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

#[cfg(feature = "toml")]
fn from_toml(content: &str) -> Result<Config, BoxError> {
    toml::from_str(content).map_err(|e| Box::new(e) as BoxError)
}

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, PokeProxyError> {
    let parse: fn(&str) -> Result<Config, BoxError> = match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => from_yaml,

        #[cfg(feature = "json")]
        "json" => from_json,

        #[cfg(feature = "toml")]
        "toml" => from_toml,

        other => return Err(PokeProxyError::UnsupportedFormat(other.to_string())),
    };

    parse(content).map_err(|source| PokeProxyError::ConfigParse {
        path: path_display.to_string(),
        source,
    })
}

/// Pick the [`FileSource`] matching the file extension.
pub fn create_file_source(path: &Path) -> Result<FileSource, PokeProxyError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let path = path.to_path_buf();

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(FileSource::new(path, "yaml", from_yaml)),

        #[cfg(feature = "json")]
        "json" => Ok(FileSource::new(path, "json", from_json)),

        #[cfg(feature = "toml")]
        "toml" => Ok(FileSource::new(path, "toml", from_toml)),

        other => Err(PokeProxyError::UnsupportedFormat(other.to_string())),
    }
}
