use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use astro_miner::api::GameApiClient;
use astro_miner::catalog::{builtin, ItemCatalog};
use astro_miner::config::Config;
use astro_miner::daemon::MinerDaemon;
use astro_miner::mining::MiningEstimate;

#[derive(Parser)]
#[command(name = "astro-miner", version, about = "Mining estimate client for Astro Miner")]
struct Cli {
    /// Config file (default: ~/.astro-miner/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file replacing the builtin shop tables
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a fresh config file
    Init {
        #[arg(long)]
        player: String,
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Fetch the player once and print the estimate per system
    Status {
        #[arg(long)]
        system: Option<u32>,
    },
    /// Submit the current estimate for one system
    Collect {
        #[arg(long)]
        system: u32,
    },
    /// Keep the snapshot fresh and re-estimate on a ticker
    Run,
    /// Print the builtin catalog as TOML
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("astro_miner=debug,info")),
        )
        .init();

    let cli = Cli::parse();

    if let Command::Init { player, api_url } = &cli.command {
        let path = cli.config.clone().unwrap_or_else(Config::config_path);
        if path.exists() {
            anyhow::bail!("Config already exists at {:?}", path);
        }
        let mut config = Config::default_for(player);
        config.apply_overrides(api_url.clone(), None);
        config.save(&path)?;
        return Ok(());
    }

    if let Command::Catalog = cli.command {
        print!("{}", builtin::to_toml().context("Failed to serialize builtin catalog")?);
        return Ok(());
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let catalog = Arc::new(load_catalog(cli.catalog.as_ref().or(config.catalog_path.as_ref()))?);

    let client = Arc::new(
        GameApiClient::new(
            config.api.url.clone(),
            config.api.player_id.clone(),
            config.api.token.clone(),
            config.api.timeout_secs,
        )
        .context("Failed to create HTTP client")?,
    );

    info!("✓ Configuration loaded");
    info!("  API: {}", config.api.url);
    info!("  Player: {}", config.api.player_id);

    match cli.command {
        Command::Init { .. } | Command::Catalog => Ok(()),
        Command::Status { system } => status(&catalog, &client, system).await,
        Command::Collect { system } => collect(&catalog, &client, system).await,
        Command::Run => {
            let daemon = MinerDaemon::new(config, catalog, client).await?;
            info!("🚀 All systems ready - starting mining loop");
            daemon.run().await
        }
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<ItemCatalog> {
    match path {
        Some(p) => ItemCatalog::load(p).with_context(|| format!("Failed to load catalog {:?}", p)),
        None => Ok(ItemCatalog::builtin()),
    }
}

async fn status(catalog: &ItemCatalog, client: &GameApiClient, system: Option<u32>) -> Result<()> {
    let player = client.fetch_player().await.context("Failed to fetch player")?;
    let now = Utc::now();

    let systems = match system {
        Some(s) => vec![s],
        None => player.systems(),
    };
    if systems.is_empty() {
        warn!("Player {} owns no drones or asteroids", player.id);
        return Ok(());
    }

    println!("{:>6}  {:>12}  {:>14}  {:>14}  {:>14}", "system", "rate/s", "accrued", "hold", "remaining");
    for s in systems {
        let est = MiningEstimate::compute(catalog, &player, s, now);
        println!(
            "{:>6}  {:>12.5}  {:>14.5}  {:>14.5}  {:>14.5}{}",
            est.system,
            est.rate,
            est.accrued,
            est.effective_cap,
            est.remaining,
            if est.is_full() { "  FULL" } else { "" }
        );
    }
    Ok(())
}

async fn collect(catalog: &ItemCatalog, client: &GameApiClient, system: u32) -> Result<()> {
    let player = client.fetch_player().await.context("Failed to fetch player")?;
    let est = MiningEstimate::compute(catalog, &player, system, Utc::now());

    if est.accrued <= 0.0 {
        warn!("Nothing to collect in system {}", system);
        return Ok(());
    }

    let result = client
        .collect(system, est.accrued)
        .await
        .with_context(|| format!("Collection in system {} failed", system))?;

    println!("Collected {:.5} in system {}", result.collected, system);
    Ok(())
}
