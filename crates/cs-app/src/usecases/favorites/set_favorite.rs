use std::sync::Arc;

use cs_core::ports::MovieCachePort;
use cs_core::MovieId;

/// Writes a favorite flag straight to the cache.
///
/// Failures are logged, never surfaced; the return value only says whether
/// the write landed.
pub struct SetFavorite {
    cache: Arc<dyn MovieCachePort>,
}

impl SetFavorite {
    pub fn new(cache: Arc<dyn MovieCachePort>) -> Self {
        Self { cache }
    }

    pub async fn execute(&self, id: &MovieId, favorite: bool) -> bool {
        match self.cache.set_favorite(id, favorite).await {
            Ok(()) => {
                tracing::info!(%id, favorite, "favorite flag updated");
                true
            }
            Err(e) => {
                tracing::warn!(%id, favorite, error = %e, "failed to update favorite flag");
                false
            }
        }
    }
}
