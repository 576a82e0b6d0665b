//! Upstream representation of the paginated listing endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PokemonListResponse {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A `{name, url}` pointer to a single entity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}
