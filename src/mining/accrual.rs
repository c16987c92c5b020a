use chrono::{DateTime, Utc};

use crate::catalog::ItemCatalog;
use crate::types::PlayerView;

use super::round5;

/// Longest absence that still accrues; anything beyond is forfeited.
pub const MAX_ACCRUAL_SECS: f64 = 3_600.0;

/// Total the player's asteroids in `system` can ever yield.
pub fn extractable_total(catalog: &ItemCatalog, player: &PlayerView, system: u32) -> f64 {
    player
        .asteroids
        .iter()
        .filter(|a| a.system == system)
        .filter_map(|a| catalog.asteroid(a.id, a.system))
        .filter_map(|item| item.total_yield)
        .filter(|y| y.is_finite() && *y > 0.0)
        .sum()
}

pub fn remaining(catalog: &ItemCatalog, player: &PlayerView, total_collected: f64, system: u32) -> f64 {
    let left = extractable_total(catalog, player, system) - total_collected;
    if left.is_finite() {
        left.max(0.0)
    } else {
        0.0
    }
}

/// Smaller of the cargo hold and what is left to extract.
pub fn effective_cap(catalog: &ItemCatalog, player: &PlayerView, total_collected: f64, system: u32) -> f64 {
    catalog
        .cargo_capacity(player.cargo_level)
        .min(remaining(catalog, player, total_collected, system))
}

/// Seconds since `last`, clamped to `[0, MAX_ACCRUAL_SECS]`.
pub fn elapsed_secs(last: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let secs = (now - last).num_milliseconds() as f64 / 1000.0;
    secs.clamp(0.0, MAX_ACCRUAL_SECS)
}

/// Resources mined in `system` since the last collection and not yet collected.
///
/// Returns 0 whenever the inputs can't support an estimate: no player, no
/// rate, nothing left to mine, a full hold, or no recorded collection.
pub fn accrued(
    catalog: &ItemCatalog,
    player: Option<&PlayerView>,
    rate: f64,
    total_collected: f64,
    system: u32,
    now: DateTime<Utc>,
) -> f64 {
    let player = match player {
        Some(p) => p,
        None => return 0.0,
    };
    if !rate.is_finite() || rate <= 0.0 {
        return 0.0;
    }

    let cap = effective_cap(catalog, player, total_collected, system);
    if cap <= 0.0 {
        return 0.0;
    }

    let last = match player.last_collection(system) {
        Some(t) => t,
        None => return 0.0,
    };

    let mined = elapsed_secs(last, now) * rate;
    round5(mined.min(cap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogTables, Capacity, ShopItem};
    use crate::types::ItemRef;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn catalog() -> ItemCatalog {
        let asteroid = |id, total| ShopItem {
            id,
            system: 1,
            price: 1.0,
            total_yield: Some(total),
            rate_per_day: None,
            capacity: None,
        };
        let cargo = |id, capacity| ShopItem {
            id,
            system: 0,
            price: 0.0,
            total_yield: None,
            rate_per_day: None,
            capacity: Some(capacity),
        };
        ItemCatalog::from_tables(CatalogTables {
            asteroids: vec![asteroid(1, 1_600.0), asteroid(2, 100.0)],
            cargo: vec![cargo(0, Capacity::Finite(50.0)), cargo(5, Capacity::Unbounded)],
            ..Default::default()
        })
        .unwrap()
    }

    fn player(asteroid: u32, collected_secs_ago: Option<i64>) -> PlayerView {
        let mut player = PlayerView {
            asteroids: vec![ItemRef { id: asteroid, system: 1 }],
            ..Default::default()
        };
        if let Some(ago) = collected_secs_ago {
            player.last_collection.insert(1, now() - Duration::seconds(ago));
        }
        player
    }

    #[test]
    fn short_absence_accrues_linearly() {
        let p = player(1, Some(100));
        assert_eq!(accrued(&catalog(), Some(&p), 0.001, 0.0, 1, now()), 0.1);
    }

    #[test]
    fn long_absence_is_capped_at_one_hour() {
        let p = player(1, Some(100_000));
        assert_eq!(accrued(&catalog(), Some(&p), 0.001, 0.0, 1, now()), 3.6);
    }

    #[test]
    fn depleted_asteroid_yields_nothing() {
        let p = player(2, Some(1_000));
        assert_eq!(accrued(&catalog(), Some(&p), 5.0, 100.0, 1, now()), 0.0);
        assert_eq!(accrued(&catalog(), Some(&p), 5.0, 250.0, 1, now()), 0.0);
    }

    #[test]
    fn future_timestamp_yields_nothing() {
        let p = player(1, Some(-10));
        assert_eq!(accrued(&catalog(), Some(&p), 0.001, 0.0, 1, now()), 0.0);
    }

    #[test]
    fn missing_inputs_yield_nothing() {
        let c = catalog();
        let p = player(1, Some(100));
        assert_eq!(accrued(&c, None, 0.001, 0.0, 1, now()), 0.0);
        assert_eq!(accrued(&c, Some(&p), 0.0, 0.0, 1, now()), 0.0);
        assert_eq!(accrued(&c, Some(&p), -1.0, 0.0, 1, now()), 0.0);
        assert_eq!(accrued(&c, Some(&p), f64::NAN, 0.0, 1, now()), 0.0);
        assert_eq!(accrued(&c, Some(&player(1, None)), 0.001, 0.0, 1, now()), 0.0);
        // no asteroid in system 2
        assert_eq!(accrued(&c, Some(&p), 0.001, 0.0, 2, now()), 0.0);
    }

    #[test]
    fn cargo_hold_bounds_accrual() {
        let p = player(1, Some(3_600));
        assert_eq!(accrued(&catalog(), Some(&p), 1.0, 0.0, 1, now()), 50.0);
    }

    #[test]
    fn remaining_bounds_accrual() {
        let mut p = player(1, Some(3_600));
        p.cargo_level = 5;
        assert_eq!(accrued(&catalog(), Some(&p), 1.0, 1_590.0, 1, now()), 10.0);
        assert_eq!(accrued(&catalog(), Some(&p), 0.01, 0.0, 1, now()), 36.0);
    }

    #[test]
    fn unknown_cargo_tier_holds_nothing() {
        let mut p = player(1, Some(100));
        p.cargo_level = 3;
        assert_eq!(accrued(&catalog(), Some(&p), 1.0, 0.0, 1, now()), 0.0);
    }

    #[test]
    fn elapsed_is_clamped_both_ways() {
        let t = now();
        assert_eq!(elapsed_secs(t - Duration::seconds(90), t), 90.0);
        assert_eq!(elapsed_secs(t - Duration::days(3), t), MAX_ACCRUAL_SECS);
        assert_eq!(elapsed_secs(t + Duration::seconds(10), t), 0.0);
    }
}
