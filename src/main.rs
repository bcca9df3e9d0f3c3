//! Martech-Sync main entry point
//!
//! This is the command-line interface for the Martech-Sync batch loader.

use clap::Parser;
use martech_sync::api::{AdsClient, NewsletterClient};
use martech_sync::config::Config;
use martech_sync::harvest::{AdsHarvester, NewsletterHarvester};
use martech_sync::project::{project, TableLoad};
use martech_sync::{load, model};
use tracing_subscriber::EnvFilter;

/// Martech-Sync: a marketing analytics batch loader
///
/// Martech-Sync pulls the full ad hierarchy with insight breakdowns from
/// the ad platform, the trailing week of newsletter performance from the
/// newsletter platform, and reloads the destination reporting tables in
/// one transactional pass.
#[derive(Parser, Debug)]
#[command(name = "martech-sync")]
#[command(version = "1.0.0")]
#[command(about = "A marketing analytics batch loader", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Harvest and project, then print per-table row counts instead of
    /// touching the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match Config::from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment");
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let loads = match run_harvest(&config).await {
        Ok(loads) => loads,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&loads);
        return Ok(());
    }

    match run_load(&config, &loads).await {
        Ok(()) => {
            tracing::info!("Sync completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Load failed, transaction rolled back: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("martech_sync=info,warn"),
            1 => EnvFilter::new("martech_sync=debug,info"),
            2 => EnvFilter::new("martech_sync=trace,debug"),
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

/// Runs both harvests and projects the trees into table loads.
async fn run_harvest(config: &Config) -> martech_sync::Result<Vec<TableLoad>> {
    tracing::info!("Harvesting newsletter platform");
    let newsletter_client = NewsletterClient::new(&config.newsletter)?;
    let publications = NewsletterHarvester::new(&newsletter_client).harvest().await?;
    tracing::info!(
        "Harvested {} publications, {} posts, {} segments",
        publications.len(),
        publications.iter().map(|p| p.posts.len()).sum::<usize>(),
        publications.iter().map(|p| p.segments.len()).sum::<usize>()
    );

    tracing::info!("Harvesting ad platform");
    let ads_client = AdsClient::new(&config.ads)?;
    let accounts = AdsHarvester::new(&ads_client, &config.ads).harvest().await?;
    tracing::info!(
        "Harvested {} ad accounts, {} campaigns",
        accounts.len(),
        accounts.iter().map(count_campaigns).sum::<usize>()
    );

    Ok(project(&publications, &accounts))
}

fn count_campaigns(account: &model::AdAccount) -> usize {
    account.campaigns.len()
}

/// Handles the --dry-run mode: shows what would be loaded
fn handle_dry_run(loads: &[TableLoad]) {
    println!("=== Martech-Sync Dry Run ===\n");
    println!("Projected rows per table:");
    for load in loads {
        println!("  {:<32} {:>6} rows", load.spec.name, load.rows.len());
    }
    let total: usize = loads.iter().map(|l| l.rows.len()).sum();
    println!("\n✓ {} rows across {} tables", total, loads.len());
    println!("✓ Database untouched");
}

/// Connects and performs the transactional truncate-and-reload.
async fn run_load(config: &Config, loads: &[TableLoad]) -> martech_sync::Result<()> {
    tracing::info!(
        "Loading into {}:{}/{}",
        config.database.host,
        config.database.port,
        config.database.dbname
    );
    let mut client = load::connect(&config.database).await?;
    load::load_tables(&mut client, loads).await
}
