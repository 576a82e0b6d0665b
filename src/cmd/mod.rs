//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler. Each handler lives in its own submodule: the
//! server itself ([`run`]), config tooling ([`init`], [`validate`]) and
//! clients of a running instance ([`health`], [`search`], [`list`]).

pub mod health;
pub mod init;
pub mod list;
pub mod run;
pub mod search;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::PokeProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), PokeProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        Some(Commands::Search(args)) => search::execute(args).await,
        Some(Commands::List(args)) => list::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  pokeproxy v{version} \u{2014} HTTP proxy for Pok\u{e9}mon data\n\n  \
         No command provided. To get started:\n\n    \
         pokeproxy run                     Start the proxy on :3000\n    \
         pokeproxy init                    Generate a starter config\n    \
         pokeproxy search pikachu          Query a running proxy\n    \
         pokeproxy --help                  See all commands and options\n"
    );
}
