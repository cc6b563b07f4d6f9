use std::sync::Arc;

use cs_core::movie::{MovieDetail, MovieSummary, QueryResult};
use cs_core::ports::{MovieApiPort, MovieCachePort};

pub type DetailResult = QueryResult<MovieDetail>;

/// Cache-then-network lookup of a title's full record.
pub struct LoadMovieDetails {
    api: Arc<dyn MovieApiPort>,
    cache: Arc<dyn MovieCachePort>,
}

impl LoadMovieDetails {
    pub fn new(api: Arc<dyn MovieApiPort>, cache: Arc<dyn MovieCachePort>) -> Self {
        Self { api, cache }
    }

    /// Emits `Pending`, a provisional cached detail when there is one, then
    /// the fetched detail or a failure. The detail is stored only on an
    /// already cached row.
    pub async fn execute<F>(&self, movie: &MovieSummary, mut emit: F)
    where
        F: FnMut(DetailResult) + Send,
    {
        let id = movie.id();
        emit(QueryResult::Pending);

        let cached = match self.cache.find_by_id(id).await {
            Ok(cached) => cached,
            Err(e) => {
                // Still worth asking the network.
                tracing::warn!(%id, error = %e, "cache lookup for details failed");
                None
            }
        };
        let cached_detail = cached.as_ref().and_then(|m| m.detail.clone());
        let had_detail = cached_detail.is_some();
        if let Some(detail) = cached_detail {
            emit(QueryResult::Ready(detail));
        }

        let detail = match self.api.details(id).await {
            Ok(detail) => detail,
            Err(e) => {
                match &cached {
                    Some(_) if had_detail => {
                        tracing::warn!(%id, error = %e, "details refresh failed, cached detail stands");
                    }
                    Some(row) => {
                        tracing::error!(%id, error = %e, "details fetch failed");
                        emit(QueryResult::Failed(format!(
                            "Trying to fetch data for {} failed.",
                            row.title
                        )));
                    }
                    None => {
                        tracing::error!(%id, error = %e, "details fetch failed");
                        emit(QueryResult::Failed(e.to_string()));
                    }
                }
                return;
            }
        };

        match cached {
            Some(row) => {
                if let Err(e) = self.cache.upsert(row.with_detail(detail.clone())).await {
                    tracing::warn!(%id, error = %e, "failed to store details");
                }
            }
            // Rows are created by searches; a lookup alone stores nothing.
            None => tracing::debug!(%id, "title not cached, details not stored"),
        }
        tracing::info!(%id, "details loaded");
        emit(QueryResult::Ready(detail));
    }
}
