use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Compound catalog key: `(item id, system id)`.
pub type ItemKey = (u32, u32);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate {table} entry for id={id} system={system}")]
    Duplicate {
        table: &'static str,
        id: u32,
        system: u32,
    },
}

/// Cargo hold size of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "RawCapacity")]
pub enum Capacity {
    Finite(f64),
    Unbounded,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCapacity {
    Number(f64),
    Text(String),
}

impl From<RawCapacity> for Capacity {
    fn from(raw: RawCapacity) -> Self {
        match raw {
            RawCapacity::Number(n) => Capacity::finite(n),
            RawCapacity::Text(text) => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("auto") || text.eq_ignore_ascii_case("unbounded") {
                    Capacity::Unbounded
                } else {
                    // Anything that isn't a number holds nothing.
                    Capacity::finite(text.parse().unwrap_or(0.0))
                }
            }
        }
    }
}

impl Serialize for Capacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Capacity::Finite(n) => serializer.serialize_f64(*n),
            Capacity::Unbounded => serializer.serialize_str("auto"),
        }
    }
}

impl Capacity {
    pub fn finite(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Capacity::Finite(value)
        } else {
            Capacity::Finite(0.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: u32,
    #[serde(default)]
    pub system: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default, alias = "totalYield", skip_serializing_if = "Option::is_none")]
    pub total_yield: Option<f64>,
    #[serde(default, alias = "ratePerDay", skip_serializing_if = "Option::is_none")]
    pub rate_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Capacity>,
}

impl ShopItem {
    pub fn key(&self) -> ItemKey {
        (self.id, self.system)
    }
}

/// On-disk layout of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogTables {
    #[serde(default)]
    pub drones: Vec<ShopItem>,
    #[serde(default)]
    pub asteroids: Vec<ShopItem>,
    #[serde(default)]
    pub cargo: Vec<ShopItem>,
    /// Concrete hold size used for `Capacity::Unbounded` tiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unbounded_ceiling: Option<f64>,
}

/// Immutable lookup tables, built once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    drones: HashMap<ItemKey, ShopItem>,
    asteroids: HashMap<ItemKey, ShopItem>,
    cargo: HashMap<u32, ShopItem>,
    unbounded_ceiling: Option<f64>,
}

impl ItemCatalog {
    /// Index the tables, rejecting any repeated key.
    pub fn from_tables(tables: CatalogTables) -> Result<Self, CatalogError> {
        let mut catalog = ItemCatalog {
            unbounded_ceiling: tables.unbounded_ceiling.filter(|c| c.is_finite() && *c >= 0.0),
            ..Default::default()
        };

        for item in tables.drones {
            if let Some(prev) = catalog.drones.insert(item.key(), item) {
                return Err(duplicate("drone", &prev));
            }
        }
        for item in tables.asteroids {
            if let Some(prev) = catalog.asteroids.insert(item.key(), item) {
                return Err(duplicate("asteroid", &prev));
            }
        }
        for item in tables.cargo {
            if let Some(prev) = catalog.cargo.insert(item.id, item) {
                return Err(duplicate("cargo", &prev));
            }
        }

        debug!(
            "Catalog indexed: {} drones, {} asteroids, {} cargo tiers",
            catalog.drones.len(),
            catalog.asteroids.len(),
            catalog.cargo.len()
        );

        Ok(catalog)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let tables: CatalogTables = toml::from_str(text)?;
        Self::from_tables(tables)
    }

    /// Load a catalog file in place of the builtin tables.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&text)?;
        info!("Loaded catalog from {:?}", path);
        Ok(catalog)
    }

    pub fn drone(&self, id: u32, system: u32) -> Option<&ShopItem> {
        self.drones.get(&(id, system))
    }

    pub fn asteroid(&self, id: u32, system: u32) -> Option<&ShopItem> {
        self.asteroids.get(&(id, system))
    }

    pub fn cargo(&self, tier: u32) -> Option<&ShopItem> {
        self.cargo.get(&tier)
    }

    /// Concrete hold size for a cargo tier.
    ///
    /// Unknown tiers hold nothing. Unbounded tiers take the catalog's declared
    /// ceiling, or no ceiling at all when the catalog declares none.
    pub fn cargo_capacity(&self, tier: u32) -> f64 {
        match self.cargo(tier).and_then(|item| item.capacity) {
            Some(Capacity::Finite(c)) => c,
            Some(Capacity::Unbounded) => self.unbounded_ceiling.unwrap_or(f64::INFINITY),
            None => 0.0,
        }
    }

    pub fn systems(&self) -> Vec<u32> {
        let mut systems: Vec<u32> = self
            .drones
            .keys()
            .chain(self.asteroids.keys())
            .map(|(_, system)| *system)
            .collect();
        systems.sort_unstable();
        systems.dedup();
        systems
    }

    pub(crate) fn index_trusted(tables: CatalogTables) -> Self {
        ItemCatalog {
            drones: tables.drones.into_iter().map(|i| (i.key(), i)).collect(),
            asteroids: tables.asteroids.into_iter().map(|i| (i.key(), i)).collect(),
            cargo: tables.cargo.into_iter().map(|i| (i.id, i)).collect(),
            unbounded_ceiling: tables.unbounded_ceiling,
        }
    }
}

fn duplicate(table: &'static str, item: &ShopItem) -> CatalogError {
    CatalogError::Duplicate {
        table,
        id: item.id,
        system: item.system,
    }
}
