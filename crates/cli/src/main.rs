//! places command-line entry point.
//!
//! Resolves a place name or a coordinate and prints the records as JSON on
//! stdout. Logging goes to stderr so stdout stays machine-readable.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use places_client::Resolver;
use places_core::{AppConfig, Coordinate};
use tracing_subscriber::EnvFilter;

/// Cache-first geocoding lookups.
#[derive(Debug, Parser)]
#[command(name = "places", version)]
struct Cli {
    /// User-Agent sent to the geocoding service (overrides PLACES_USER_AGENT).
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up places by name.
    Name {
        /// Free-form place query.
        query: String,
    },
    /// Look up the place at a coordinate.
    Coord {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(user_agent) = cli.user_agent {
        config.user_agent = Some(user_agent);
        config.validate()?;
    }

    let resolver = Resolver::from_config(&config).await?;

    let places = match cli.command {
        Command::Name { query } => resolver.resolve_by_name(&query).await?,
        Command::Coord { lat, lon } => resolver.resolve_by_coordinate(Coordinate::new(lat, lon)?).await?,
    };

    tracing::info!(count = places.len(), "resolved");
    println!("{}", serde_json::to_string_pretty(&places)?);

    Ok(())
}
