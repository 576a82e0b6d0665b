//! Configuration loading and layering.
//!
//! Built-in defaults are overlaid by an optional config file (explicit
//! `--config` or auto-detected in the working directory), then by CLI
//! flags and environment variables ([`Overrides`]). The merged result is
//! validated once, after every layer has been applied.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::PokeProxyError;
use model::Config;
use sources::file_source::FileSource;

const CANDIDATES: [&str; 4] = [
    "pokeproxy.yaml",
    "pokeproxy.yml",
    "pokeproxy.json",
    "pokeproxy.toml",
];

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_body: Option<usize>,
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(max_body) = self.max_body {
            config.server.max_body = max_body;
        }
        if let Some(base_url) = self.base_url {
            config.upstream.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.upstream.timeout = timeout;
        }
    }
}

/// A fully layered and validated config plus a label naming where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub source_name: String,
}

pub async fn load(
    explicit: Option<&Path>,
    overrides: Overrides,
) -> Result<LoadedConfig, PokeProxyError> {
    let (mut config, source_name) = match resolve_file_source(explicit).await? {
        Some(source) => {
            let config = source.load().await?;
            tracing::debug!(
                path = %source.path().display(),
                format = source.name(),
                "config file parsed"
            );
            (config, source.path().display().to_string())
        }
        None => (Config::default(), "defaults".to_string()),
    };

    overrides.apply(&mut config);

    if let Err(errors) = validation::validate(&config) {
        return Err(PokeProxyError::ConfigValidation { errors });
    }

    Ok(LoadedConfig {
        config,
        source_name,
    })
}

async fn resolve_file_source(explicit: Option<&Path>) -> Result<Option<FileSource>, PokeProxyError> {
    if let Some(path) = explicit {
        return sources::create_file_source(path).map(Some);
    }

    for name in &CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return sources::create_file_source(&path).map(Some);
        }
    }

    Ok(None)
}
