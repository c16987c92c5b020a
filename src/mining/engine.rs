use crate::api::{ApiError, GameApiClient};
use crate::catalog::ItemCatalog;
use crate::mining::MiningEstimate;
use crate::state::StateManager;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

/// Re-estimates accrual on a fixed tick; optionally collects full holds.
pub struct MiningEngine {
    state_manager: StateManager,
    catalog: Arc<ItemCatalog>,
    collector: Option<Arc<GameApiClient>>,
    systems: Vec<u32>,
    tick_interval_secs: u64,
    full: HashSet<u32>,
    /// Systems whose collection the server refused, keyed to the sync it was refused under.
    rejected: HashMap<u32, Option<DateTime<Utc>>>,
}

impl MiningEngine {
    pub fn new(
        state_manager: StateManager,
        catalog: Arc<ItemCatalog>,
        systems: Vec<u32>,
        tick_interval_secs: u64,
    ) -> Self {
        Self {
            state_manager,
            catalog,
            collector: None,
            systems,
            tick_interval_secs,
            full: HashSet::new(),
            rejected: HashMap::new(),
        }
    }

    pub fn with_auto_collect(mut self, client: Arc<GameApiClient>) -> Self {
        self.collector = Some(client);
        self
    }

    pub async fn run(mut self) {
        let mut ticker = interval(Duration::from_secs(self.tick_interval_secs));

        info!(
            "⛏️  Mining estimate started (tick every {}s, auto-collect: {})",
            self.tick_interval_secs,
            self.collector.is_some()
        );

        loop {
            ticker.tick().await;
            self.tick(Utc::now()).await;
        }
    }

    pub async fn tick(&mut self, now: DateTime<Utc>) -> Vec<MiningEstimate> {
        let snapshot = self.state_manager.get_snapshot().await;

        let player = match snapshot.player {
            Some(p) => p,
            None => {
                debug!("Mining tick skipped: no player snapshot yet");
                return vec![];
            }
        };

        // A fresh snapshot lifts earlier refusals.
        let last_sync = snapshot.last_sync;
        self.rejected.retain(|_, at| *at == last_sync);

        let systems = if self.systems.is_empty() {
            player.systems()
        } else {
            self.systems.clone()
        };

        let mut estimates = Vec::with_capacity(systems.len());

        for system in systems {
            let est = MiningEstimate::compute(&self.catalog, &player, system, now);

            debug!(
                "System {}: rate {:.5}/s | accrued {:.5} / {:.5} | remaining {:.5}",
                est.system, est.rate, est.accrued, est.effective_cap, est.remaining
            );

            if est.is_full() {
                if self.full.insert(system) {
                    info!("📦 Cargo full in system {} ({:.5})", system, est.accrued);
                }
                self.try_collect(&est, last_sync, now).await;
            } else {
                self.full.remove(&system);
            }

            estimates.push(est);
        }

        estimates
    }

    async fn try_collect(&mut self, est: &MiningEstimate, last_sync: Option<DateTime<Utc>>, now: DateTime<Utc>) {
        let client = match &self.collector {
            Some(c) => c.clone(),
            None => return,
        };
        if self.rejected.contains_key(&est.system) {
            debug!("Auto-collect in system {} held until next sync", est.system);
            return;
        }

        match client.collect(est.system, est.accrued).await {
            Ok(result) => {
                self.state_manager
                    .record_collection(est.system, result.collected, now)
                    .await;
                self.full.remove(&est.system);
            }
            Err(ApiError::Rejected(reason)) => {
                warn!(
                    "⚠️  Auto-collect rejected in system {}: {}. Holding until next sync",
                    est.system, reason
                );
                self.rejected.insert(est.system, last_sync);
            }
            Err(e) => {
                warn!("⚠️  Auto-collect failed in system {}: {}", est.system, e);
            }
        }
    }

    pub fn is_full(&self, system: u32) -> bool {
        self.full.contains(&system)
    }

    pub fn is_held(&self, system: u32) -> bool {
        self.rejected.contains_key(&system)
    }
}
