// astro-miner/src/catalog/mod.rs
// Read-only shop catalog: drones, asteroids and cargo tiers

pub mod builtin;
pub mod items;

pub use items::{CatalogError, CatalogTables, Capacity, ItemCatalog, ItemKey, ShopItem};
