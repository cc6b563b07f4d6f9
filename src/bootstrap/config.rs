//! Configuration loading.
//!
//! Reads the TOML file into [`AppConfig`] and overlays environment
//! variables. A missing file is not an error: every key has a default.

use std::path::Path;

use anyhow::Context;
use cs_core::config::AppConfig;

/// Overrides `[api] api_key`.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let mut config = if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        AppConfig::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?
    } else {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        AppConfig::default()
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            config.api.api_key = key.trim().to_string();
        }
    }
}
