//! Process-local movie cache.
//!
//! Same contract as the SQLite cache, used when `storage.in_memory` is set
//! and as the stateful cache in use-case tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use cs_core::movie::MovieSummary;
use cs_core::ports::{MovieCacheError, MovieCachePort};
use cs_core::MovieId;

#[derive(Debug, Clone)]
struct StoredMovie {
    movie: MovieSummary,
    rank: usize,
    /// Insertion sequence, used to order favorites deterministically.
    seq: u64,
}

#[derive(Default)]
struct Inner {
    rows: HashMap<MovieId, StoredMovie>,
    next_seq: u64,
    fail_reads: bool,
    fail_writes: bool,
}

pub struct InMemoryMovieCache {
    inner: Mutex<Inner>,
    favorites_tx: watch::Sender<Vec<MovieSummary>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for InMemoryMovieCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMovieCache {
    pub fn new() -> Self {
        let (favorites_tx, _) = watch::channel(Vec::new());
        Self {
            inner: Mutex::new(Inner::default()),
            favorites_tx,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent read fail with a storage error.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Make every subsequent write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of read operations served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of successful write operations so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Every stored entry, in no particular order.
    pub fn snapshot(&self) -> Vec<MovieSummary> {
        self.lock().rows.values().map(|s| s.movie.clone()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, f: impl FnOnce(&mut Inner) -> Result<(), MovieCacheError>) -> Result<(), MovieCacheError> {
        let favorites = {
            let mut inner = self.lock();
            if inner.fail_writes {
                return Err(MovieCacheError::Storage("writes disabled".to_string()));
            }
            f(&mut inner)?;
            favorites_of(&inner)
        };
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.favorites_tx.send_replace(favorites);
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Inner) -> T) -> Result<T, MovieCacheError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let inner = self.lock();
        if inner.fail_reads {
            return Err(MovieCacheError::Storage("reads disabled".to_string()));
        }
        Ok(f(&inner))
    }
}

fn favorites_of(inner: &Inner) -> Vec<MovieSummary> {
    let mut favorites: Vec<&StoredMovie> =
        inner.rows.values().filter(|s| s.movie.is_favorite).collect();
    favorites.sort_by_key(|s| s.seq);
    favorites.into_iter().map(|s| s.movie.clone()).collect()
}

fn put(inner: &mut Inner, mut movie: MovieSummary, rank: Option<usize>) {
    movie.is_selected = false;
    let seq = inner.next_seq;
    inner.next_seq += 1;
    match inner.rows.get_mut(movie.id()) {
        Some(existing) => {
            // Only set_favorite changes a stored flag.
            movie.is_favorite = existing.movie.is_favorite;
            existing.movie = movie;
            if let Some(rank) = rank {
                existing.rank = rank;
            }
        }
        None => {
            inner.rows.insert(
                movie.id().clone(),
                StoredMovie {
                    movie,
                    rank: rank.unwrap_or(0),
                    seq,
                },
            );
        }
    }
}

#[async_trait]
impl MovieCachePort for InMemoryMovieCache {
    async fn upsert(&self, movie: MovieSummary) -> Result<(), MovieCacheError> {
        self.write(|inner| {
            put(inner, movie, None);
            Ok(())
        })
    }

    async fn upsert_many(&self, movies: Vec<MovieSummary>) -> Result<(), MovieCacheError> {
        self.write(|inner| {
            for (rank, movie) in movies.into_iter().enumerate() {
                put(inner, movie, Some(rank));
            }
            Ok(())
        })
    }

    async fn find_by_id(&self, id: &MovieId) -> Result<Option<MovieSummary>, MovieCacheError> {
        self.read(|inner| inner.rows.get(id).map(|s| s.movie.clone()))
    }

    async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<MovieSummary>, MovieCacheError> {
        self.read(|inner| {
            ids.iter()
                .filter_map(|id| inner.rows.get(id).map(|s| s.movie.clone()))
                .collect()
        })
    }

    async fn find_by_search_term(
        &self,
        term: &str,
    ) -> Result<Vec<MovieSummary>, MovieCacheError> {
        self.read(|inner| {
            let mut hits: Vec<&StoredMovie> = inner
                .rows
                .values()
                .filter(|s| s.movie.search_term == term)
                .collect();
            hits.sort_by_key(|s| (s.rank, s.seq));
            hits.into_iter().map(|s| s.movie.clone()).collect()
        })
    }

    async fn list_favorites(&self) -> Result<Vec<MovieSummary>, MovieCacheError> {
        self.read(favorites_of)
    }

    fn subscribe_favorites(&self) -> watch::Receiver<Vec<MovieSummary>> {
        self.favorites_tx.subscribe()
    }

    async fn set_favorite(&self, id: &MovieId, favorite: bool) -> Result<(), MovieCacheError> {
        self.write(|inner| match inner.rows.get_mut(id) {
            Some(stored) => {
                stored.movie.is_favorite = favorite;
                Ok(())
            }
            None => Err(MovieCacheError::NotFound),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::movie::MediaType;

    fn movie(id: &str, term: &str) -> MovieSummary {
        MovieSummary::new(MovieId::from(id), id, "2001", MediaType::Movie, "N/A")
            .with_search_term(term)
    }

    #[tokio::test]
    async fn batch_order_is_kept_for_term_lookups() {
        let cache = InMemoryMovieCache::new();
        cache
            .upsert_many(vec![movie("b", "x"), movie("a", "x"), movie("c", "y")])
            .await
            .unwrap();

        let ids: Vec<String> = cache
            .find_by_search_term("x")
            .await
            .unwrap()
            .iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn failed_writes_leave_state_untouched() {
        let cache = InMemoryMovieCache::new();
        cache.fail_writes(true);

        assert!(cache.upsert(movie("a", "x")).await.is_err());
        assert_eq!(cache.write_count(), 0);
        assert!(cache.snapshot().is_empty());
    }

    #[tokio::test]
    async fn failed_reads_report_storage_errors() {
        let cache = InMemoryMovieCache::new();
        cache.upsert(movie("a", "x")).await.unwrap();
        cache.fail_reads(true);

        assert!(matches!(
            cache.find_by_search_term("x").await,
            Err(MovieCacheError::Storage(_))
        ));
        assert!(cache.find_by_id(&MovieId::from("a")).await.is_err());
        assert!(cache.upsert(movie("b", "x")).await.is_ok());
    }

    #[tokio::test]
    async fn upsert_keeps_the_stored_favorite_flag() {
        let cache = InMemoryMovieCache::new();
        cache.upsert(movie("a", "x")).await.unwrap();
        cache.set_favorite(&MovieId::from("a"), true).await.unwrap();

        cache.upsert_many(vec![movie("a", "y")]).await.unwrap();

        let stored = cache.find_by_id(&MovieId::from("a")).await.unwrap().unwrap();
        assert!(stored.is_favorite);
        assert_eq!(stored.search_term, "y");
        assert_eq!(cache.subscribe_favorites().borrow().len(), 1);
    }

    #[tokio::test]
    async fn set_favorite_on_missing_row_is_not_found() {
        let cache = InMemoryMovieCache::new();
        let err = cache.set_favorite(&MovieId::from("nope"), true).await;
        assert_eq!(err, Err(MovieCacheError::NotFound));
    }
}
