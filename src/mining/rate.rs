use crate::catalog::ItemCatalog;
use crate::types::PlayerView;

use super::round5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Per-second mining rate of the player's drones in `system`.
///
/// Drones that don't resolve in the catalog, or resolve without a daily rate,
/// add nothing.
pub fn mining_rate(catalog: &ItemCatalog, player: &PlayerView, system: u32) -> f64 {
    let per_second: f64 = player
        .drones
        .iter()
        .filter(|d| d.system == system)
        .filter_map(|d| catalog.drone(d.id, d.system))
        .filter_map(|item| item.rate_per_day)
        .filter(|r| r.is_finite() && *r > 0.0)
        .map(|r| r / SECONDS_PER_DAY)
        .sum();

    round5(per_second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogTables, ShopItem};
    use crate::types::ItemRef;

    fn catalog() -> ItemCatalog {
        let drone = |id, system, rate| ShopItem {
            id,
            system,
            price: 1.0,
            total_yield: None,
            rate_per_day: rate,
            capacity: None,
        };
        ItemCatalog::from_tables(CatalogTables {
            drones: vec![
                drone(1, 1, Some(96.0)),
                drone(2, 1, Some(864.0)),
                drone(1, 2, Some(8_640.0)),
                drone(3, 1, None),
            ],
            ..Default::default()
        })
        .unwrap()
    }

    fn owning(drones: &[(u32, u32)]) -> PlayerView {
        PlayerView {
            drones: drones
                .iter()
                .map(|&(id, system)| ItemRef { id, system })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn single_drone_rate_is_rounded() {
        let rate = mining_rate(&catalog(), &owning(&[(1, 1)]), 1);
        assert_eq!(rate, 0.00111);
    }

    #[test]
    fn duplicates_count_and_other_systems_are_ignored() {
        let player = owning(&[(2, 1), (2, 1), (1, 2)]);
        assert_eq!(mining_rate(&catalog(), &player, 1), 0.02);
        assert_eq!(mining_rate(&catalog(), &player, 2), 0.1);
    }

    #[test]
    fn unresolved_and_rateless_drones_add_nothing() {
        let player = owning(&[(9, 1), (3, 1), (1, 7)]);
        assert_eq!(mining_rate(&catalog(), &player, 1), 0.0);
        assert_eq!(mining_rate(&catalog(), &player, 7), 0.0);
    }

    #[test]
    fn no_drones_means_zero() {
        assert_eq!(mining_rate(&catalog(), &PlayerView::default(), 1), 0.0);
    }
}
