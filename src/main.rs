//! Pokedex CLI - Explore the PokeAPI catalog from an interactive prompt
//!
//! Responses are cached in memory for a short TTL so paging back and forth or
//! inspecting the same pokemon again does not hit the network.

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pokedex::cli::{Cli, StartupConfig};
use pokedex::repl;
use pokedex::session::Session;

/// Installs the stderr log subscriber, honouring `RUST_LOG` when set
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    setup_logging(config.verbose);
    tracing::debug!(?config, "starting session");

    let mut session = Session::new(&config);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();

    let result = repl::run(&mut session, stdin, &mut stdout).await;

    session.shutdown().await;
    result?;

    Ok(())
}
