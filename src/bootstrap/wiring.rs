//! Dependency assembly.
//!
//! The only place that picks concrete adapters: SQLite or in-memory cache,
//! the OMDb client, and the use cases built on top of them. No decisions
//! beyond what the configuration says.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cs_app::app_paths::AppPaths;
use cs_app::{
    FavoriteToggleCoordinator, ListFavorites, LoadMovieDetails, SearchMovies, SearchOrchestrator,
    SetFavorite, WatchSearchState,
};
use cs_core::config::AppConfig;
use cs_core::ports::{MovieApiPort, MovieCachePort};
use cs_infra::{open_sqlite_cache, InMemoryMovieCache, OmdbClient};

/// Everything the commands need, wired once per process.
pub struct AppServices {
    pub search_state: Arc<WatchSearchState>,
    pub orchestrator: SearchOrchestrator,
    pub toggler: FavoriteToggleCoordinator,
    pub details: LoadMovieDetails,
    pub favorites: ListFavorites,
    pub set_favorite: SetFavorite,
    pub cache: Arc<dyn MovieCachePort>,
}

pub fn wire_services(config: &AppConfig, paths: &AppPaths) -> anyhow::Result<AppServices> {
    if config.api.api_key.is_empty() {
        tracing::warn!("no OMDb API key configured, requests will be rejected");
    }
    let api: Arc<dyn MovieApiPort> = Arc::new(OmdbClient::new(
        config.api.base_url.clone(),
        config.api.api_key.clone(),
        config.request_timeout(),
    )?);
    let cache = build_cache(config, paths)?;
    Ok(wire_services_with(config, api, cache))
}

/// Assemble the use cases over already constructed adapters.
pub fn wire_services_with(
    config: &AppConfig,
    api: Arc<dyn MovieApiPort>,
    cache: Arc<dyn MovieCachePort>,
) -> AppServices {
    let search_state = Arc::new(WatchSearchState::new());
    let orchestrator = SearchOrchestrator::new(
        SearchMovies::new(api.clone(), cache.clone()),
        config.debounce(),
        search_state.clone(),
    );

    AppServices {
        search_state,
        orchestrator,
        toggler: FavoriteToggleCoordinator::new(cache.clone(), config.toggle_settle()),
        details: LoadMovieDetails::new(api, cache.clone()),
        favorites: ListFavorites::new(cache.clone()),
        set_favorite: SetFavorite::new(cache.clone()),
        cache,
    }
}

fn build_cache(config: &AppConfig, paths: &AppPaths) -> anyhow::Result<Arc<dyn MovieCachePort>> {
    if config.storage.in_memory {
        tracing::info!("using in-memory movie cache");
        return Ok(Arc::new(InMemoryMovieCache::new()));
    }

    let db_path = resolve_db_path(config, paths);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }
    tracing::info!(path = %db_path.display(), "opening movie cache");

    let cache = open_sqlite_cache(&db_path.to_string_lossy())
        .with_context(|| format!("Failed to open movie cache: {}", db_path.display()))?;
    Ok(Arc::new(cache))
}

fn resolve_db_path(config: &AppConfig, paths: &AppPaths) -> PathBuf {
    if config.storage.database_path.as_os_str().is_empty() {
        paths.db_path.clone()
    } else {
        config.storage.database_path.clone()
    }
}
