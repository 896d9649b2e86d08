use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::locale;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_WATCHMODE_BASE_URL: &str = "https://api.watchmode.com/v1";
pub const DEFAULT_RECENTS_MAX: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Two-letter region for availability; detected from the locale when unset
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_recents_max")]
    pub recents_max: usize,
    #[serde(default)]
    pub provider_policy: ProviderPolicy,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub watchmode: WatchmodeConfig,
}

/// Which availability schema wins when both answered
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPolicy {
    /// Flat source list if it produced a group, else the region-grouped response
    #[default]
    PreferFlat,
    /// Region-grouped response if it produced a group, else the flat source list
    PreferGrouped,
    FlatOnly,
    GroupedOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchmodeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_watchmode_base_url")]
    pub base_url: String,
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_recents_max() -> usize {
    DEFAULT_RECENTS_MAX
}

fn default_tmdb_base_url() -> String {
    DEFAULT_TMDB_BASE_URL.to_string()
}

fn default_watchmode_base_url() -> String {
    DEFAULT_WATCHMODE_BASE_URL.to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
        }
    }
}

impl Default for WatchmodeConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_watchmode_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            language: default_language(),
            recents_max: default_recents_max(),
            provider_policy: ProviderPolicy::default(),
            tmdb: TmdbConfig::default(),
            watchmode: WatchmodeConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or defaults when it does not exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recents_max == 0 {
            return Err(anyhow::anyhow!("recents_max must be at least 1"));
        }

        if let Some(region) = &self.region {
            if !locale::is_region_code(region) {
                return Err(anyhow::anyhow!("Invalid region code: {} (expected two letters, e.g. US)", region));
            }
        }

        if self.language.trim().is_empty() {
            return Err(anyhow::anyhow!("language cannot be empty"));
        }

        for (name, url) in [("tmdb", &self.tmdb.base_url), ("watchmode", &self.watchmode.base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} base_url must be an http(s) URL: {}", name, url));
            }
        }

        Ok(())
    }

    /// Configured region, else the one in the process locale, else US
    pub fn effective_region(&self) -> String {
        self.region
            .as_deref()
            .filter(|r| locale::is_region_code(r))
            .map(str::to_uppercase)
            .or_else(locale::region_from_env)
            .unwrap_or_else(|| locale::DEFAULT_REGION.to_string())
    }
}
