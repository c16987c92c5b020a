use crate::api::GameApiClient;
use crate::catalog::ItemCatalog;
use crate::config::Config;
use crate::mining::MiningEngine;
use crate::state::StateManager;
use crate::sync::{start_sync_loop, sync_once};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

pub struct MinerDaemon {
    config: Config,
    state_manager: StateManager,
    client: Arc<GameApiClient>,
    mining_engine: MiningEngine,
}

impl MinerDaemon {
    pub async fn new(config: Config, catalog: Arc<ItemCatalog>, client: Arc<GameApiClient>) -> Result<Self> {
        let state_manager = StateManager::new();

        // A failed first fetch is not fatal; the sync loop keeps trying.
        match sync_once(&client, &state_manager).await {
            Ok(()) => info!("✓ Initial player snapshot loaded"),
            Err(e) => warn!("⚠️  Initial sync failed: {:#}", e),
        }

        // Engine shares the SAME state handle as the sync loop
        let mut mining_engine = MiningEngine::new(
            state_manager.clone(),
            catalog,
            config.mining.systems.clone(),
            config.mining.tick_interval_secs,
        );
        if config.mining.auto_collect {
            mining_engine = mining_engine.with_auto_collect(client.clone());
        }

        Ok(Self {
            config,
            state_manager,
            client,
            mining_engine,
        })
    }

    pub async fn run(self) -> Result<()> {
        let sync_client = self.client.clone();
        let sync_state = self.state_manager.clone();
        let sync_interval = self.config.mining.sync_interval_secs;
        tokio::spawn(async move {
            start_sync_loop(sync_client, sync_state, sync_interval).await;
        });

        // Mining estimate runs in the current task
        self.mining_engine.run().await;

        Ok(())
    }
}
