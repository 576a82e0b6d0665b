//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health, search, list), and their
//! associated argument structs. Server flags have environment variable
//! equivalents for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(
    name = "pokeproxy",
    version,
    about = "HTTP proxy for Pok\u{e9}mon data",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        pokeproxy run                       Start on :3000 against pokeapi.co\n  \
        pokeproxy search pikachu            Look up a Pok\u{e9}mon through a running proxy\n  \
        pokeproxy list --page 2             Browse the paginated listing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),

    /// Look up one or more Pokémon by name or id through a running instance
    Search(SearchArgs),

    /// Show one page of the Pokémon listing from a running instance
    List(ListArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        pokeproxy run                                   Defaults (or ./pokeproxy.yaml)\n  \
        pokeproxy run -c pokeproxy.yaml                 Specific config file\n  \
        pokeproxy run -p 8080 --pretty                  Local dev mode\n  \
        pokeproxy run --base-url http://127.0.0.1:9000  Alternate upstream")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port [default: 3000]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Listen address [default: 0.0.0.0]
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    // -- Upstream --
    /// Base URL of the upstream Pokémon API [default: https://pokeapi.co/api/v2]
    #[arg(long, env = "POKEAPI_BASE_URL", help_heading = "Upstream")]
    pub base_url: Option<String>,

    /// Upstream request timeout in milliseconds [default: 5000]
    #[arg(long, env = "EXTERNAL_API_TIMEOUT", help_heading = "Upstream")]
    pub timeout: Option<u64>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes [default: 1048576]
    #[arg(long, env = "MAX_BODY_SIZE", help_heading = "Tuning")]
    pub max_body: Option<usize>,
}

impl RunArgs {
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            max_body: self.max_body,
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        pokeproxy init                          Minimal config (yaml)\n  \
        pokeproxy init --full                   Every option, documented\n  \
        pokeproxy init -f toml -o config.toml   TOML format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include full documentation as comments
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "pokeproxy.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = DEFAULT_API_URL)]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Names or ids to look up; repeated queries are served from memory
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// URL of the running instance
    #[arg(long, env = "POKEPROXY_URL", default_value = DEFAULT_API_URL)]
    pub url: String,

    /// Print the raw JSON document instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Results per page (1-100)
    #[arg(long, default_value_t = 20)]
    pub limit: u32,

    /// URL of the running instance
    #[arg(long, env = "POKEPROXY_URL", default_value = DEFAULT_API_URL)]
    pub url: String,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
