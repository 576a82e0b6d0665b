//! `pokeproxy run` — start the proxy server.
//!
//! Layers configuration from defaults, an optional file and CLI/env
//! overrides, builds the upstream client, and serves the API until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use url::Url;

use crate::cli::RunArgs;
use crate::config;
use crate::error::PokeProxyError;
use crate::logging;
use crate::server::{self, AppState};
use crate::upstream::PokeApiClient;

pub async fn execute(args: RunArgs) -> Result<(), PokeProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let loaded = config::load(args.config.as_deref(), args.overrides()).await?;
    let config = loaded.config;

    let base_url = Url::parse(&config.upstream.base_url).map_err(|e| PokeProxyError::UriParse {
        source: Box::new(e),
    })?;

    let pokeapi = PokeApiClient::new(
        server::build_http_client(config.upstream.pool_idle_timeout()),
        base_url,
        config.upstream.timeout(),
    );
    let state = Arc::new(AppState { pokeapi });

    let router = server::build_router(state, config.server.max_body);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %config.upstream.base_url,
        timeout_ms = config.upstream.timeout,
        config_source = %loaded.source_name,
        "pokeproxy started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("pokeproxy stopped");
    Ok(())
}
