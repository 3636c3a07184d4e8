// Entry point for the catalog sync CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use sync_core::common::Manifest;
use sync_core::domains::sheets::SheetReader;
use sync_core::domains::sync::{run_diagnostics, sync_products, SheetWatcher};
use sync_core::domains::vendor::VendorScraper;
use sync_core::kernel::{HttpPageFetcher, SyncDeps};
use sync_core::{log_filter_for, validate_env, Config, VendorConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sync")]
#[command(about = "Google Sheets → Shopify catalog sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test the Google Sheets connection and show what would be synced
    Check,

    /// Run one sheet → Shopify → database sync
    Sync,

    /// Poll the sheet and sync whenever it changes
    Watch {
        /// Seconds between polls (defaults to SYNC_INTERVAL)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Report duplicate part numbers and compare the sheet with the store
    Debug,

    /// Look up vendor prices for SKUs
    Vendor {
        #[arg(required = true)]
        skus: Vec<String>,
    },

    /// Validate a pinned dependency manifest
    CheckManifest { path: PathBuf },

    /// Check that every required environment variable is set
    ValidateConfig,

    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before logging so LOG_LEVEL applies
    let _ = dotenvy::dotenv();
    let default_filter = log_filter_for(&std::env::var("LOG_LEVEL").unwrap_or_default());

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::CheckManifest { path } => check_manifest(&path),
        Commands::ValidateConfig => validate_env(),
        Commands::Check => {
            let (_, deps) = load()?;
            check_connection(&deps).await
        }
        Commands::Sync => {
            let (_, deps) = load()?;
            deps.migrate().await?;
            let reader = SheetReader::new(deps.sheets.clone());
            let products = reader.get_all_products().await?;
            let report = sync_products(&deps, &products).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Watch { interval } => {
            let (config, deps) = load()?;
            deps.migrate().await?;
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.sync_interval);
            watch(deps, interval).await
        }
        Commands::Debug => {
            let (_, deps) = load()?;
            let report = run_diagnostics(&deps).await?;
            if report.duplicate_part_numbers.is_empty() {
                tracing::info!("No duplicates in sheet");
            } else {
                tracing::warn!(duplicates = ?report.duplicate_part_numbers, "Duplicate part numbers in sheet");
            }
            if report.store_looks_empty() {
                tracing::warn!("Store returned 0 products; duplicate checks against Shopify will not work");
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Vendor { skus } => {
            let vendor = VendorConfig::from_env().context("Failed to load vendor configuration")?;
            let scraper = VendorScraper::new(
                Arc::new(HttpPageFetcher::new()?),
                &vendor.base_url,
                vendor.request_delay,
            );
            let results = scraper.batch_search(&skus).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Commands::Migrate => {
            let (_, deps) = load()?;
            deps.migrate().await
        }
    }
}

fn load() -> Result<(Config, SyncDeps)> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(environment = %config.environment, "Configuration loaded");
    let deps = SyncDeps::from_config(&config)?;
    Ok((config, deps))
}

async fn check_connection(deps: &SyncDeps) -> Result<()> {
    tracing::info!("Testing Google Sheets connection...");
    let reader = SheetReader::new(deps.sheets.clone());

    let metadata = reader
        .get_sheet_metadata()
        .await
        .context("Google Sheets connection failed")?;
    tracing::info!(
        sheet = %metadata.title,
        worksheet = %metadata.worksheet_title,
        rows = metadata.row_count,
        columns = metadata.col_count,
        headers = metadata.header_count(),
        "Connected to Google Sheets"
    );

    let products = reader.get_all_products().await?;
    tracing::info!(count = products.len(), "Products found");

    if let Some(first) = products.first() {
        for (key, value) in first.fields.iter().take(5) {
            tracing::info!("  {}: {}", key, value);
        }
    }

    tracing::info!("Google Sheets connection OK");
    Ok(())
}

async fn watch(deps: SyncDeps, interval: Duration) -> Result<()> {
    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    let mut watcher = SheetWatcher::new(SheetReader::new(deps.sheets.clone()), interval);
    watcher
        .run(cancel, |products| {
            let deps = deps.clone();
            async move {
                sync_products(&deps, &products).await?;
                Ok::<(), anyhow::Error>(())
            }
        })
        .await
}

fn check_manifest(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let problems = Manifest::lint(&text);
    if !problems.is_empty() {
        for problem in &problems {
            tracing::error!("{}: {}", path.display(), problem);
        }
        anyhow::bail!("{} problem(s) in {}", problems.len(), path.display());
    }

    let manifest = Manifest::parse(&text)?;
    for group in manifest.groups() {
        println!("# {}", group.header.as_deref().unwrap_or("(ungrouped)"));
        for requirement in &group.requirements {
            println!("{} {}", requirement.name, requirement.version);
        }
    }
    tracing::info!(packages = manifest.len(), "Manifest is valid");
    Ok(())
}
