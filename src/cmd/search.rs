//! `pokeproxy search` — look up Pokémon through a running instance.
//!
//! Each query is trimmed and lowercased into a cache key. Hits are
//! served from a [`DetailCache`] that lives for this invocation only,
//! misses go to `GET /api/pokemon/{key}`.

use std::fmt::Write;

use hyper::StatusCode;
use serde_json::Value;

use crate::cli::SearchArgs;
use crate::client::cache::DetailCache;
use crate::client::ApiClient;
use crate::error::PokeProxyError;

pub const MSG_EMPTY_QUERY: &str = "Por favor, introduce el nombre o ID de un Pok\u{e9}mon.";
pub const MSG_NOT_FOUND: &str = "Pok\u{e9}mon no encontrado. Revisa el nombre o el n\u{fa}mero.";
pub const MSG_CONNECTION: &str =
    "Error de conexi\u{f3}n con el servidor. Verifica que el backend est\u{e1} arrancado.";

pub async fn execute(args: SearchArgs) -> Result<(), PokeProxyError> {
    let client = ApiClient::new(&args.url);
    let mut cache = DetailCache::new();
    let mut failed = 0;

    for (i, query) in args.queries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match lookup(&client, &mut cache, query).await {
            Ok(data) if args.json => println!("{data}"),
            Ok(data) => print!("{}", render_pokemon(&data)),
            Err(message) => {
                eprintln!("{message}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(PokeProxyError::SearchFailed {
            failed,
            total: args.queries.len(),
        });
    }
    Ok(())
}

/// Resolve one query, returning the user-facing message on failure.
async fn lookup(
    client: &ApiClient,
    cache: &mut DetailCache,
    query: &str,
) -> Result<Value, String> {
    let key = DetailCache::key(query);
    if key.is_empty() {
        return Err(MSG_EMPTY_QUERY.to_string());
    }

    if let Some(hit) = cache.get(&key) {
        tracing::debug!(key = %key, "served from cache");
        return Ok(hit.clone());
    }

    match client.pokemon(&key).await {
        Ok(data) => {
            cache.set(key, data.clone());
            Ok(data)
        }
        Err(e) => Err(failure_message(&e)),
    }
}

fn failure_message(error: &PokeProxyError) -> String {
    match error {
        PokeProxyError::Api { status, .. } if *status == StatusCode::NOT_FOUND => {
            MSG_NOT_FOUND.to_string()
        }
        PokeProxyError::Api { status, .. } => format!(
            "Error al consultar el Pok\u{e9}mon (c\u{f3}digo {}).",
            status.as_u16()
        ),
        _ => MSG_CONNECTION.to_string(),
    }
}

/// Tenths of a unit (decimetres, hectograms) shown with one decimal.
/// Missing or zero values render as `N/D`.
fn tenths(value: Option<&Value>, unit: &str) -> String {
    match value.and_then(Value::as_f64) {
        Some(v) if v != 0.0 => format!("{:.1} {unit}", v / 10.0),
        _ => "N/D".to_string(),
    }
}

fn image_url(data: &Value) -> Option<&str> {
    let sprites = data.get("sprites")?;
    sprites
        .pointer("/other/official-artwork/front_default")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            sprites
                .get("front_default")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
}

#[must_use]
pub fn render_pokemon(data: &Value) -> String {
    let name = data.get("name").and_then(Value::as_str).unwrap_or("");
    let id = data.get("id").and_then(Value::as_u64).unwrap_or(0);

    let types: Vec<&str> = data
        .get("types")
        .and_then(Value::as_array)
        .map(|types| {
            types
                .iter()
                .filter_map(|t| t.pointer("/type/name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let mut out = String::new();
    // write! to String is infallible
    let _ = writeln!(out, "{name}  #{id:03}");
    let _ = writeln!(
        out,
        "  Tipos:  {}",
        if types.is_empty() {
            "Desconocido".to_string()
        } else {
            types.join(" ")
        }
    );
    let _ = writeln!(out, "  Altura: {}", tenths(data.get("height"), "m"));
    let _ = writeln!(out, "  Peso:   {}", tenths(data.get("weight"), "kg"));
    let _ = writeln!(
        out,
        "  Imagen: {}",
        image_url(data).unwrap_or("Sin imagen disponible")
    );

    let _ = writeln!(out, "  Estad\u{ed}sticas base");
    let stats = data
        .get("stats")
        .and_then(Value::as_array)
        .filter(|s| !s.is_empty());
    match stats {
        Some(stats) => {
            for stat in stats {
                let stat_name = stat
                    .pointer("/stat/name")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .replacen('-', " ", 1);
                let base = stat.get("base_stat").and_then(Value::as_u64).unwrap_or(0);
                let _ = writeln!(out, "    {stat_name:<16} {base:>3}");
            }
        }
        None => {
            let _ = writeln!(out, "    Sin datos");
        }
    }
    out
}
