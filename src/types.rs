use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Reference to an owned item; resolved against the catalog by `(id, system)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: u32,
    pub system: u32,
}

/// The slice of the player record the mining estimate reads.
///
/// Built from the API's user JSON. Malformed pieces are dropped here so the
/// calculators never see them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "PlayerRecord")]
pub struct PlayerView {
    pub id: String,
    pub drones: Vec<ItemRef>,
    pub asteroids: Vec<ItemRef>,
    pub cargo_level: u32,
    pub collected: HashMap<u32, f64>,
    pub last_collection: HashMap<u32, DateTime<Utc>>,
}

impl PlayerView {
    pub fn collected(&self, system: u32) -> f64 {
        self.collected.get(&system).copied().unwrap_or(0.0)
    }

    pub fn last_collection(&self, system: u32) -> Option<DateTime<Utc>> {
        self.last_collection.get(&system).copied()
    }

    /// Systems in which the player owns a drone or an asteroid.
    pub fn systems(&self) -> Vec<u32> {
        self.drones
            .iter()
            .chain(self.asteroids.iter())
            .map(|r| r.system)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Loose wire shape of the API user object.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlayerRecord {
    id: Option<serde_json::Value>,
    telegram_id: Option<serde_json::Value>,
    drones: Option<serde_json::Value>,
    asteroids: Option<serde_json::Value>,
    cargo_level: Option<serde_json::Value>,
    collected_by_system: Option<serde_json::Value>,
    last_collection_time: Option<serde_json::Value>,
}

impl From<PlayerRecord> for PlayerView {
    fn from(raw: PlayerRecord) -> Self {
        let id = match raw.id.or(raw.telegram_id) {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let collected = per_system(raw.collected_by_system.as_ref())
            .filter_map(|(system, amount)| {
                let amount = number(amount)?;
                (amount.is_finite() && amount >= 0.0).then_some((system, amount))
            })
            .collect();

        let last_collection = per_system(raw.last_collection_time.as_ref())
            .filter_map(|(system, stamp)| Some((system, parse_timestamp(stamp.as_str()?)?)))
            .collect();

        PlayerView {
            id,
            drones: item_refs(raw.drones.as_ref()),
            asteroids: item_refs(raw.asteroids.as_ref()),
            cargo_level: raw.cargo_level.as_ref().and_then(index).unwrap_or(0),
            collected,
            last_collection,
        }
    }
}

/// Entries of an array of `{id, system}` objects; anything else is empty.
fn item_refs(value: Option<&serde_json::Value>) -> Vec<ItemRef> {
    value
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(ItemRef {
                        id: index(item.get("id")?)?,
                        system: index(item.get("system")?)?,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Entries of an object keyed by system id; anything else is empty.
fn per_system(
    value: Option<&serde_json::Value>,
) -> impl Iterator<Item = (u32, &serde_json::Value)> {
    value
        .and_then(serde_json::Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(system, v)| Some((system.trim().parse::<u32>().ok()?, v)))
}

/// Non-negative whole number, from a JSON number or numeric string.
fn index(value: &serde_json::Value) -> Option<u32> {
    number(value)
        .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

/// Numbers arrive either as JSON numbers or numeric strings.
fn number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// ISO 8601 timestamp; a missing offset is read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
