use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, info, warn};

use crate::api::GameApiClient;
use crate::state::StateManager;

/// Pull the player record every `interval_secs` and replace the local snapshot.
///
/// Failures are logged and retried on the next tick; the loop never exits.
pub async fn start_sync_loop(client: Arc<GameApiClient>, state: StateManager, interval_secs: u64) {
    info!("🔄 Player sync started (every {}s)", interval_secs);

    let mut interval = time::interval(Duration::from_secs(interval_secs));
    let mut failures: u32 = 0;

    loop {
        interval.tick().await;

        match sync_once(&client, &state).await {
            Ok(()) => {
                if failures > 0 {
                    info!("✅ Sync recovered after {} failed attempt(s)", failures);
                }
                failures = 0;
            }
            Err(e) => {
                failures += 1;
                warn!("❌ Sync failed: {:#}. Will retry in {}s", e, interval_secs);
            }
        }
    }
}

pub async fn sync_once(client: &GameApiClient, state: &StateManager) -> Result<()> {
    let player = client
        .fetch_player()
        .await
        .with_context(|| format!("Failed to fetch player {}", client.player_id()))?;

    debug!(
        "Fetched player {}: {} drone(s), {} asteroid(s), cargo tier {}",
        player.id,
        player.drones.len(),
        player.asteroids.len(),
        player.cargo_level
    );

    state.replace_player(player).await;
    Ok(())
}
