//! Pokeproxy is an HTTP proxy in front of a public Pokémon data API.
//!
//! It exposes a small JSON API (a health probe, a paginated listing and a
//! detail lookup by name or id), forwards each call to the upstream API
//! with a bounded timeout, and answers every failure with the same error
//! envelope. All responses carry permissive CORS headers.
//!
//! # Architecture
//!
//! - [`api`] -- Request dispatch, listing/detail handlers, pagination and
//!   response formatting.
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`client`] -- HTTP client for a running instance, with an
//!   invocation-scoped detail cache.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate,
//!   health, search, list).
//! - [`config`] -- Configuration model, file loading and validation.
//! - [`error`] -- Crate-level error types using `thiserror`.
//! - [`health`] -- `GET /api/health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- Correlation id layer wrapping every route.
//! - [`server`] -- Axum server setup, shared application state, HTTP client,
//!   and graceful shutdown.
//! - [`upstream`] -- Outbound client for the upstream Pokémon API.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod upstream;
