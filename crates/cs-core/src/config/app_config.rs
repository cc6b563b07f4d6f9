//! # Configuration DTO
//!
//! Plain data mapped from the TOML settings file. Every section is optional
//! in the file; missing sections and keys take the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub favorites: FavoritesConfig,
    pub storage: StorageConfig,
}

/// OMDb endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// May be empty here; the bootstrap layer overlays `OMDB_API_KEY`.
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search runs
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    /// Delay between the optimistic flip and the write, during which a
    /// newer toggle supersedes the pending one
    pub toggle_settle_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Empty means "use the default location under the app data dir".
    pub database_path: PathBuf,
    /// Keep the cache in memory only (nothing survives the process).
    pub in_memory: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.omdbapi.com".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 400 }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            toggle_settle_ms: 250,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document. Unknown keys are ignored.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn toggle_settle(&self) -> Duration {
        Duration::from_millis(self.favorites.toggle_settle_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
