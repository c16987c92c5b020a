//! Client-side mining estimate for the astro-miner idle game.
//!
//! The server owns every balance. This crate reads a player snapshot, works
//! out how fast each system is being mined and how much has piled up since
//! the last collection, and can hand that estimate back to the server.

pub mod api;
pub mod catalog;
pub mod config;
pub mod daemon;
pub mod mining;
pub mod state;
pub mod sync;
pub mod types;

pub use catalog::{Capacity, ItemCatalog, ShopItem};
pub use mining::{accrued, mining_rate, MiningEstimate};
pub use types::{ItemRef, PlayerView};
