//! Statline - terminal guessing game.

use anyhow::Result;
use clap::Parser;
use statline::cli::{Cli, Command};
use statline::{Catalog, StatlineConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StatlineConfig::resolve(cli.config.as_deref())?;
    let catalog = Catalog::load(cli.catalog.as_deref())?;

    match cli.command {
        Command::Play { rounds, seed } => statline::run(config, catalog, rounds, seed).await,
        Command::Check { id, name } => check(&config, &catalog, &id, &name),
    }
}

/// Prints which matching layer accepts `name` for player `id`.
#[instrument(skip(config, catalog))]
fn check(config: &StatlineConfig, catalog: &Catalog, id: &str, name: &str) -> Result<()> {
    let matcher = catalog.matching_engine(*config.cache_capacity());
    match catalog.explain(&matcher, id, name)? {
        Some(kind) => {
            info!(%kind, "Name matched");
            println!("match ({kind})");
        }
        None => println!("no match"),
    }
    Ok(())
}
