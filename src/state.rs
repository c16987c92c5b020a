use crate::types::PlayerView;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct MinerState {
    pub player: Option<PlayerView>,
    pub last_sync: Option<DateTime<Utc>>,
}

/// Shared holder of the latest player snapshot from the server.
#[derive(Clone, Default)]
pub struct StateManager {
    pub state: Arc<RwLock<MinerState>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_handle(&self) -> Arc<RwLock<MinerState>> {
        self.state.clone()
    }

    pub async fn replace_player(&self, player: PlayerView) {
        let mut state = self.state.write().await;
        debug!(
            "Snapshot replaced: player={} drones={} asteroids={} cargo={}",
            player.id,
            player.drones.len(),
            player.asteroids.len(),
            player.cargo_level
        );
        state.player = Some(player);
        state.last_sync = Some(Utc::now());
    }

    /// Apply a confirmed collection locally until the next sync overwrites it.
    pub async fn record_collection(&self, system: u32, amount: f64, at: DateTime<Utc>) {
        let mut state = self.state.write().await;

        if let Some(player) = state.player.as_mut() {
            if amount.is_finite() && amount > 0.0 {
                *player.collected.entry(system).or_insert(0.0) += amount;
            }
            player.last_collection.insert(system, at);
        }
    }

    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.last_sync
    }

    pub async fn get_snapshot(&self) -> MinerState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn collection_updates_snapshot() {
        let manager = StateManager::new();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        // nothing to update before the first sync
        manager.record_collection(1, 5.0, at).await;
        assert!(manager.get_snapshot().await.player.is_none());

        manager.replace_player(PlayerView::default()).await;
        assert!(manager.last_sync().await.is_some());

        manager.record_collection(1, 5.0, at).await;
        manager.record_collection(1, 2.5, at).await;
        manager.record_collection(1, -1.0, at).await;

        let player = manager.get_snapshot().await.player.unwrap();
        assert_eq!(player.collected(1), 7.5);
        assert_eq!(player.last_collection(1), Some(at));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let manager = StateManager::new();
        let other = StateManager { state: manager.get_handle() };
        other.replace_player(PlayerView { id: "7".into(), ..Default::default() }).await;
        assert_eq!(manager.get_snapshot().await.player.unwrap().id, "7");
    }
}
