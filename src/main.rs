//! Coin-Ledger main entry point
//!
//! This is the command-line interface for the Coin-Ledger collection tracker.

use anyhow::{bail, Context};
use clap::Parser;
use coin_ledger::api::{self, ApiState};
use coin_ledger::auth::ensure_account;
use coin_ledger::config::{load_config_with_hash, Config};
use coin_ledger::output::{load_statistics, print_statistics};
use coin_ledger::storage::{self, SqliteStorage, Storage};
use coin_ledger::CoinPipeline;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Coin-Ledger: a commemorative 2-euro coin collection tracker
///
/// Coin-Ledger builds a catalog of commemorative coins from public pages,
/// keeps track of the coins a collector owns, and serves both over a JSON
/// API.
#[derive(Parser, Debug)]
#[command(name = "coin-ledger")]
#[command(version = "1.0.0")]
#[command(about = "A commemorative 2-euro coin collection tracker", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the scrape pipeline, print the coins as JSON and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    scrape: bool,

    /// Validate config and show what would be scraped and served
    #[arg(long, conflicts_with_all = ["scrape", "stats"])]
    dry_run: bool,

    /// Show collection statistics for a user and exit
    #[arg(long, value_name = "USERNAME", conflicts_with_all = ["scrape", "dry_run"])]
    stats: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.scrape {
        handle_scrape(&config).await?;
    } else if let Some(username) = &cli.stats {
        handle_stats(&config, username)?;
    } else {
        handle_serve(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("coin_ledger=info,warn"),
            1 => EnvFilter::new("coin_ledger=debug,info"),
            2 => EnvFilter::new("coin_ledger=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.storage.database_path);
    storage::open_storage(path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let scraper = &config.scraper;

    println!("=== Coin-Ledger Dry Run ===\n");

    println!("Scraper Configuration:");
    println!(
        "  Primary source: {} (years {}..={})",
        scraper.primary_base_url, scraper.first_year, scraper.last_year
    );
    if scraper.secondary_enabled {
        println!(
            "  Secondary source: {} ({} countries)",
            scraper.secondary_base_url,
            scraper.countries.len()
        );
    } else {
        println!("  Secondary source: disabled");
    }
    println!("  Request delay: {}ms", scraper.request_delay);
    println!("  Request timeout: {}s", scraper.request_timeout);
    println!("  User agent: {}", scraper.user_agent);

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);
    println!("  CORS origins: {}", config.server.cors_origins.join(", "));

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    match &config.account {
        Some(account) => println!("\nAccount: {}", account.username),
        None => println!("\nAccount: none configured"),
    }

    let pages = (scraper.last_year - scraper.first_year + 1) as usize
        + if scraper.secondary_enabled {
            scraper.countries.len()
        } else {
            0
        };

    println!("\n✓ Configuration is valid");
    println!("✓ A scrape would request {} pages", pages);
}

/// Handles the --scrape mode: runs the pipeline and prints the result
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    let coins = CoinPipeline::new(config.scraper.clone()).collect().await;
    let json = serde_json::to_string_pretty(&coins).context("Failed to serialize coins")?;
    println!("{}", json);
    Ok(())
}

/// Handles the --stats mode: shows one user's collection statistics
fn handle_stats(config: &Config, username: &str) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open_storage(config)?;
    let Some(user) = storage.get_user_by_username(username)? else {
        bail!("Unknown user: {}", username);
    };

    let stats = load_statistics(&storage, &user.id)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the default mode: seeds the database and serves the API
async fn handle_serve(config: Config) -> anyhow::Result<()> {
    let mut storage = open_storage(&config)?;

    if let Some(account) = &config.account {
        ensure_account(&mut storage, account).context("Failed to create account")?;
    }

    let existing = storage.count_coins()?;
    if existing == 0 {
        tracing::info!("Coin catalog is empty, running the scrape pipeline");
        let coins = CoinPipeline::new(config.scraper.clone()).collect().await;
        let inserted = storage.insert_coins(&coins)?;
        tracing::info!("Stored {} coins", inserted);
    } else {
        tracing::info!("Coin catalog holds {} coins", existing);
    }

    let state = Arc::new(ApiState::new(storage));
    api::serve(&config.server, state)
        .await
        .context("API server failed")?;

    Ok(())
}
