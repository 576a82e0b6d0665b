//! `pokeproxy init` — generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates. Existing files are never overwritten.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::PokeProxyError;

pub fn execute(args: &InitArgs) -> Result<(), PokeProxyError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("pokeproxy.{}", args.format.extension())));

    if output.exists() {
        return Err(PokeProxyError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# pokeproxy config

server:
  port: 3000

upstream:
  base_url: "https://pokeapi.co/api/v2"
"#;

const YAML_FULL: &str = r#"# pokeproxy config
#
# All values shown are defaults. CLI flags and environment variables
# (PORT, HOST, POKEAPI_BASE_URL, EXTERNAL_API_TIMEOUT, MAX_BODY_SIZE)
# take precedence over this file.

server:
  host: "0.0.0.0"             # Listen address
  port: 3000                  # Listen port
  max_body: 1048576           # Max request body size in bytes

upstream:
  base_url: "https://pokeapi.co/api/v2"
  timeout: 5000               # Per-request deadline in ms, the request is aborted after it
  pool_idle_timeout: 30       # Seconds before idle upstream connections are closed
"#;

const JSON_MINIMAL: &str = r#"{
  "server": { "port": 3000 },
  "upstream": { "base_url": "https://pokeapi.co/api/v2" }
}
"#;

const JSON_FULL: &str = r#"{
  "server": {
    "host": "0.0.0.0",
    "port": 3000,
    "max_body": 1048576
  },
  "upstream": {
    "base_url": "https://pokeapi.co/api/v2",
    "timeout": 5000,
    "pool_idle_timeout": 30
  }
}
"#;

const TOML_MINIMAL: &str = r#"# pokeproxy config

[server]
port = 3000

[upstream]
base_url = "https://pokeapi.co/api/v2"
"#;

const TOML_FULL: &str = r#"# pokeproxy config
#
# All values shown are defaults. CLI flags and environment variables
# take precedence over this file.

[server]
host = "0.0.0.0"
port = 3000
max_body = 1048576      # bytes

[upstream]
base_url = "https://pokeapi.co/api/v2"
timeout = 5000          # ms
pool_idle_timeout = 30  # seconds
"#;
