use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const API_URL_ENV: &str = "ASTRO_MINER_API_URL";
pub const TOKEN_ENV: &str = "ASTRO_MINER_TOKEN";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Catalog file replacing the builtin shop tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    pub api: ApiConfig,
    #[serde(default)]
    pub mining: MiningConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApiConfig {
    pub url: String,
    pub player_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MiningConfig {
    /// Systems to watch; empty means every system the player owns items in.
    pub systems: Vec<u32>,
    pub tick_interval_secs: u64,
    pub sync_interval_secs: u64,
    pub auto_collect: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            systems: vec![],
            tick_interval_secs: 5,
            sync_interval_secs: 60,
            auto_collect: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from `path` (or the default location), then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found at: {:?}\n\n\
                 Create one with `astro-miner init --player <id>`.",
                config_path
            );
        }

        let config_str = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let mut config = Self::from_toml_str(&config_str)?;
        config.apply_overrides(std::env::var(API_URL_ENV).ok(), std::env::var(TOKEN_ENV).ok());

        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".astro-miner")
            .join("config.toml")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        fs::write(path, config_str)
            .context("Failed to write config file")?;

        info!("Configuration saved to: {:?}", path);
        Ok(())
    }

    pub fn default_for(player_id: &str) -> Self {
        Self {
            catalog_path: None,
            api: ApiConfig {
                url: "https://api.astro-miner.app".to_string(),
                player_id: player_id.to_string(),
                token: None,
                timeout_secs: default_timeout_secs(),
            },
            mining: MiningConfig::default(),
        }
    }

    /// Environment values win over the file.
    pub fn apply_overrides(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.url = url;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.api.token = Some(token);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api.player_id.trim().is_empty() {
            anyhow::bail!("api.player_id must not be empty");
        }
        if self.mining.tick_interval_secs == 0 || self.mining.sync_interval_secs == 0 {
            anyhow::bail!("mining intervals must be at least one second");
        }
        Ok(())
    }
}
