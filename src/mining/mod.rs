pub mod accrual;
pub mod engine;
pub mod rate;

use chrono::{DateTime, Utc};

use crate::catalog::ItemCatalog;
use crate::types::PlayerView;

pub use accrual::{accrued, MAX_ACCRUAL_SECS};
pub use engine::MiningEngine;
pub use rate::mining_rate;

/// Round to 5 decimal places.
pub fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// Everything the client shows about one system at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiningEstimate {
    pub system: u32,
    pub rate: f64,
    pub accrued: f64,
    pub remaining: f64,
    pub effective_cap: f64,
}

impl MiningEstimate {
    pub fn compute(catalog: &ItemCatalog, player: &PlayerView, system: u32, now: DateTime<Utc>) -> Self {
        let collected = player.collected(system);
        let rate = mining_rate(catalog, player, system);

        Self {
            system,
            rate,
            accrued: accrued(catalog, Some(player), rate, collected, system, now),
            remaining: accrual::remaining(catalog, player, collected, system),
            effective_cap: accrual::effective_cap(catalog, player, collected, system),
        }
    }

    /// The hold can't take any more until the player collects.
    pub fn is_full(&self) -> bool {
        self.effective_cap > 0.0 && self.accrued >= round5(self.effective_cap)
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemRef;
    use chrono::{Duration, TimeZone};

    #[test]
    fn round5_matches_fixed_point_display() {
        assert_eq!(round5(96.0 / 86_400.0), 0.00111);
        assert_eq!(round5(0.123456), 0.12346);
        assert_eq!(round5(0.0), 0.0);
    }

    #[test]
    fn estimate_for_builtin_starter_kit() {
        let catalog = ItemCatalog::builtin();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut player = PlayerView {
            drones: vec![ItemRef { id: 4, system: 1 }],
            asteroids: vec![ItemRef { id: 1, system: 1 }],
            ..Default::default()
        };
        player.last_collection.insert(1, now - Duration::hours(5));

        let est = MiningEstimate::compute(&catalog, &player, 1, now);
        // 1680/day over a full hour is 70, tier 0 holds 50
        assert_eq!(est.rate, round5(1_680.0 / 86_400.0));
        assert_eq!(est.accrued, 50.0);
        assert_eq!(est.remaining, 1_600.0);
        assert_eq!(est.effective_cap, 50.0);
        assert!(est.is_full());
        assert!(!est.is_depleted());

        // idempotent
        assert_eq!(est, MiningEstimate::compute(&catalog, &player, 1, now));
    }
}
