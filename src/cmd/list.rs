//! `pokeproxy list` — print one page of the listing from a running instance.

use std::fmt::Write;

use crate::api::pagination::PokemonListPage;
use crate::cli::ListArgs;
use crate::client::ApiClient;
use crate::error::PokeProxyError;

pub async fn execute(args: ListArgs) -> Result<(), PokeProxyError> {
    let client = ApiClient::new(&args.url);
    let page = client.list(args.page, args.limit).await?;
    print!("{}", render_page(&page));
    Ok(())
}

#[must_use]
pub fn render_page(page: &PokemonListPage) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "P\u{e1}gina {} (mostrando {} resultados de {})",
        page.page, page.limit, page.total
    );
    for pokemon in &page.results {
        let _ = writeln!(out, "  #{:03}  {}", pokemon.id, pokemon.name);
    }
    let _ = writeln!(
        out,
        "\u{2190} anterior: {}   siguiente: {} \u{2192}",
        yes_no(page.has_prev_page),
        yes_no(page.has_next_page)
    );
    out
}

const fn yes_no(available: bool) -> &'static str {
    if available {
        "s\u{ed}"
    } else {
        "no"
    }
}
