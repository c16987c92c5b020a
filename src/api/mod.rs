// astro-miner/src/api/mod.rs
// REST access to the authoritative game server

pub mod client;

pub use client::{ApiError, CollectRequest, CollectResponse, GameApiClient};
