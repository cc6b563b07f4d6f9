use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use cs_core::movie::{MovieSummary, QueryResult, SearchResult};
use cs_core::ports::{MovieApiError, MovieApiPort, MovieCachePort};
use cs_core::MovieId;

/// How a single search invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank term, answered with an empty list.
    Blank,
    /// Superseded before finishing; nothing further was emitted or written.
    Cancelled,
    /// The cached list stands as the final answer (network failed or
    /// returned the same number of titles).
    ServedFromCache,
    /// Fresh results were stored and emitted.
    Refreshed(usize),
    Failed,
}

/// One cache-then-network search, without debouncing.
///
/// Emission order per invocation: `Pending`, then an optional provisional
/// `Ready(cached)`, then at most one final `Ready`/`Failed`. Nothing is
/// emitted and nothing is written once `cancel` has fired.
pub struct SearchMovies {
    api: Arc<dyn MovieApiPort>,
    cache: Arc<dyn MovieCachePort>,
}

impl SearchMovies {
    pub fn new(api: Arc<dyn MovieApiPort>, cache: Arc<dyn MovieCachePort>) -> Self {
        Self { api, cache }
    }

    pub async fn execute<F>(
        &self,
        term: &str,
        cancel: &CancellationToken,
        mut emit: F,
    ) -> SearchOutcome
    where
        F: FnMut(SearchResult) + Send,
    {
        if term.trim().is_empty() {
            tracing::debug!("blank search term, clearing results");
            emit(QueryResult::Ready(Vec::new()));
            return SearchOutcome::Blank;
        }

        let mut emit = |result: SearchResult| {
            if !cancel.is_cancelled() {
                emit(result);
            }
        };

        emit(QueryResult::Pending);

        let cached = match cancel
            .run_until_cancelled(self.cache.find_by_search_term(term))
            .await
        {
            None => return SearchOutcome::Cancelled,
            Some(Ok(cached)) => cached,
            Some(Err(e)) => {
                tracing::error!(term, error = %e, "cache lookup failed");
                emit(QueryResult::Failed(e.to_string()));
                return SearchOutcome::Failed;
            }
        };

        let known_favorites: HashSet<MovieId> = cached
            .iter()
            .filter(|m| m.is_favorite)
            .map(|m| m.id().clone())
            .collect();

        if !cached.is_empty() {
            tracing::info!(term, count = cached.len(), "serving cached results");
            emit(QueryResult::Ready(cached.clone()));
        }

        let page = match cancel.run_until_cancelled(self.api.search(term)).await {
            None => return SearchOutcome::Cancelled,
            Some(Ok(page)) => page,
            Some(Err(MovieApiError::Transport(reason))) if !cached.is_empty() => {
                tracing::warn!(term, %reason, "network failed, cached results stand");
                return SearchOutcome::ServedFromCache;
            }
            Some(Err(e)) => {
                tracing::error!(term, error = %e, "search request failed");
                emit(QueryResult::Failed(e.to_string()));
                return SearchOutcome::Failed;
            }
        };

        if !cached.is_empty() && page.movies.len() == cached.len() {
            tracing::info!(term, "network results unchanged");
            return SearchOutcome::ServedFromCache;
        }

        let mut movies = page.movies;
        for movie in movies.iter_mut() {
            movie.search_term = term.to_string();
            if known_favorites.contains(movie.id()) {
                movie.is_favorite = true;
            }
        }

        // The same title may already be stored under another term.
        let ids: Vec<MovieId> = movies.iter().map(|m| m.id().clone()).collect();
        let stored = match cancel.run_until_cancelled(self.cache.find_by_ids(&ids)).await {
            None => return SearchOutcome::Cancelled,
            Some(Ok(stored)) => stored,
            Some(Err(e)) => {
                tracing::error!(term, error = %e, "cache lookup by id failed");
                emit(QueryResult::Failed(e.to_string()));
                return SearchOutcome::Failed;
            }
        };
        merge_local_state(&mut movies, &stored);

        if cancel.is_cancelled() {
            return SearchOutcome::Cancelled;
        }

        if let Err(e) = self.cache.upsert_many(movies.clone()).await {
            tracing::error!(term, error = %e, "failed to store search results");
            emit(QueryResult::Failed(e.to_string()));
            return SearchOutcome::Failed;
        }

        let count = movies.len();
        tracing::info!(term, count, "emitting network results");
        emit(QueryResult::Ready(movies));
        SearchOutcome::Refreshed(count)
    }
}

fn merge_local_state(movies: &mut [MovieSummary], stored: &[MovieSummary]) {
    let stored: HashMap<&MovieId, &MovieSummary> = stored.iter().map(|m| (m.id(), m)).collect();
    for movie in movies.iter_mut() {
        if let Some(previous) = stored.get(movie.id()) {
            movie.retain_local_state(previous);
        }
    }
}
