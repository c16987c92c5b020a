// Default game catalog shipped with the client.

use super::items::{CatalogTables, Capacity, ItemCatalog, ShopItem};

// (id, system, price, rate per day)
const DRONES: &[(u32, u32, f64, f64)] = &[
    (1, 1, 5.0, 96.0),
    (2, 1, 12.0, 240.0),
    (3, 1, 30.0, 624.0),
    (4, 1, 75.0, 1_680.0),
    (1, 2, 40.0, 120.0),
    (2, 2, 95.0, 300.0),
    (3, 2, 220.0, 720.0),
    (1, 3, 300.0, 150.0),
    (2, 3, 650.0, 360.0),
    (3, 3, 1_400.0, 840.0),
    (1, 4, 2_000.0, 200.0),
    (2, 4, 4_500.0, 480.0),
];

// (id, system, price, total yield)
const ASTEROIDS: &[(u32, u32, f64, f64)] = &[
    (1, 1, 3.0, 1_600.0),
    (2, 1, 9.0, 5_200.0),
    (3, 1, 25.0, 15_000.0),
    (1, 2, 30.0, 2_400.0),
    (2, 2, 80.0, 7_500.0),
    (1, 3, 250.0, 3_200.0),
    (2, 3, 600.0, 10_000.0),
    (1, 4, 1_800.0, 4_800.0),
];

// (tier, price, capacity); `None` is the unbounded tier
const CARGO: &[(u32, f64, Option<f64>)] = &[
    (0, 0.0, Some(50.0)),
    (1, 10.0, Some(150.0)),
    (2, 45.0, Some(500.0)),
    (3, 150.0, Some(2_000.0)),
    (4, 600.0, None),
];

pub fn tables() -> CatalogTables {
    CatalogTables {
        drones: DRONES
            .iter()
            .map(|&(id, system, price, rate)| ShopItem {
                id,
                system,
                price,
                total_yield: None,
                rate_per_day: Some(rate),
                capacity: None,
            })
            .collect(),
        asteroids: ASTEROIDS
            .iter()
            .map(|&(id, system, price, total)| ShopItem {
                id,
                system,
                price,
                total_yield: Some(total),
                rate_per_day: None,
                capacity: None,
            })
            .collect(),
        cargo: CARGO
            .iter()
            .map(|&(id, price, capacity)| ShopItem {
                id,
                system: 0,
                price,
                total_yield: None,
                rate_per_day: None,
                capacity: Some(capacity.map_or(Capacity::Unbounded, Capacity::Finite)),
            })
            .collect(),
        unbounded_ceiling: None,
    }
}

impl ItemCatalog {
    pub fn builtin() -> Self {
        ItemCatalog::index_trusted(tables())
    }
}

/// Builtin tables as a catalog file, a starting point for `catalog_path`.
pub fn to_toml() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&tables())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_have_unique_keys() {
        assert!(ItemCatalog::from_tables(tables()).is_ok());
    }

    #[test]
    fn dumped_tables_load_back() {
        let text = to_toml().unwrap();
        assert!(text.contains(r#"capacity = "auto""#));

        let catalog = ItemCatalog::from_toml_str(&text).unwrap();
        let builtin = ItemCatalog::builtin();
        assert_eq!(catalog.systems(), builtin.systems());
        for tier in 0..5 {
            assert_eq!(catalog.cargo_capacity(tier), builtin.cargo_capacity(tier));
        }
        assert_eq!(catalog.drone(4, 1), builtin.drone(4, 1));
        assert_eq!(catalog.asteroid(2, 3), builtin.asteroid(2, 3));
    }

    #[test]
    fn builtin_covers_four_systems() {
        let catalog = ItemCatalog::builtin();
        assert_eq!(catalog.systems(), vec![1, 2, 3, 4]);
        assert_eq!(catalog.drone(1, 1).unwrap().rate_per_day, Some(96.0));
        assert_eq!(catalog.cargo_capacity(0), 50.0);
        assert_eq!(catalog.cargo_capacity(4), f64::INFINITY);
    }
}
