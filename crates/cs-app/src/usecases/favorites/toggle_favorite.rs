use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;

use cs_core::movie::{mark_selected, MovieSummary};
use cs_core::ports::{MovieCacheError, MovieCachePort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The flag was persisted with this value.
    Committed(bool),
    /// A later toggle (or shutdown) cancelled this one before it persisted.
    Cancelled,
    /// Persisting failed; the error was logged and the optimistic flag kept.
    FailedSilently,
    /// Nothing to toggle: no explicit movie and no selection.
    Skipped,
}

/// Handle on one toggle. Dropping it does not cancel the toggle.
pub struct ToggleTicket {
    done: oneshot::Receiver<ToggleOutcome>,
}

impl ToggleTicket {
    fn resolved(outcome: ToggleOutcome) -> Self {
        let (tx, done) = oneshot::channel();
        let _ = tx.send(outcome);
        Self { done }
    }

    pub async fn outcome(self) -> ToggleOutcome {
        self.done.await.unwrap_or(ToggleOutcome::Cancelled)
    }
}

/// Flips favorite flags with at most one toggle pending at a time.
///
/// The flip is applied to the selection immediately; the write happens
/// after a settle window, and a newer toggle cancels a pending one before
/// it reaches the cache. Must be used inside a Tokio runtime.
pub struct FavoriteToggleCoordinator {
    cache: Arc<dyn MovieCachePort>,
    settle: Duration,
    selection: watch::Sender<Option<MovieSummary>>,
    pending: Mutex<Option<CancellationToken>>,
}

impl FavoriteToggleCoordinator {
    pub fn new(cache: Arc<dyn MovieCachePort>, settle: Duration) -> Self {
        let (selection, _) = watch::channel(None);
        Self {
            cache,
            settle,
            selection,
            pending: Mutex::new(None),
        }
    }

    pub fn select(&self, movie: Option<MovieSummary>) {
        self.selection.send_replace(movie);
    }

    pub fn selection(&self) -> watch::Receiver<Option<MovieSummary>> {
        self.selection.subscribe()
    }

    /// Highlight the selected title in a freshly published list.
    ///
    /// The selection's favorite flag wins over the list's copy, which may
    /// predate a toggle that has not settled yet. Returns its position.
    pub fn restore_selection(&self, movies: &mut [MovieSummary]) -> Option<usize> {
        let selected = self.selection.borrow();
        let selected = selected.as_ref();
        let position = mark_selected(movies, selected.map(|m| m.id()))?;
        if let Some(selected) = selected {
            movies[position].is_favorite = selected.is_favorite;
        }
        Some(position)
    }

    pub fn toggle(&self, movie: Option<MovieSummary>) -> ToggleTicket {
        let mut pending = self.lock_pending();
        if let Some(prior) = pending.take() {
            prior.cancel();
        }

        let Some(mut target) = self.resolve_target(movie) else {
            tracing::debug!("toggle requested with nothing selected");
            return ToggleTicket::resolved(ToggleOutcome::Skipped);
        };

        let favorite = !target.is_favorite;
        target.is_favorite = favorite;
        self.selection.send_if_modified(|selected| match selected {
            Some(selected) if selected.id() == target.id() => {
                selected.is_favorite = favorite;
                true
            }
            _ => false,
        });

        let cancel = CancellationToken::new();
        *pending = Some(cancel.clone());
        drop(pending);

        let (tx, done) = oneshot::channel();
        let cache = self.cache.clone();
        let settle = self.settle;

        tokio::spawn(async move {
            if cancel
                .run_until_cancelled(tokio::time::sleep(settle))
                .await
                .is_none()
            {
                tracing::debug!(id = %target.id(), "toggle superseded");
                let _ = tx.send(ToggleOutcome::Cancelled);
                return;
            }
            let outcome = persist(cache.as_ref(), target, favorite).await;
            let _ = tx.send(outcome);
        });

        ToggleTicket { done }
    }

    /// The selection is authoritative when the caller passes the same title.
    fn resolve_target(&self, movie: Option<MovieSummary>) -> Option<MovieSummary> {
        let selected = self.selection.borrow().clone();
        match (movie, selected) {
            (Some(movie), Some(selected)) if movie.id() == selected.id() => Some(selected),
            (Some(movie), _) => Some(movie),
            (None, selected) => selected,
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FavoriteToggleCoordinator {
    fn drop(&mut self) {
        if let Some(pending) = self.lock_pending().take() {
            pending.cancel();
        }
    }
}

async fn persist(cache: &dyn MovieCachePort, movie: MovieSummary, favorite: bool) -> ToggleOutcome {
    let result = match cache.set_favorite(movie.id(), favorite).await {
        Err(MovieCacheError::NotFound) => {
            tracing::debug!(id = %movie.id(), "toggled title not cached yet, storing it");
            cache.upsert(movie.clone().with_favorite(favorite)).await
        }
        other => other,
    };

    match result {
        Ok(()) => {
            tracing::info!(id = %movie.id(), favorite, "favorite toggled");
            ToggleOutcome::Committed(favorite)
        }
        Err(e) => {
            tracing::warn!(id = %movie.id(), favorite, error = %e, "failed to persist favorite");
            ToggleOutcome::FailedSilently
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::movie;
    use cs_core::MovieId;
    use cs_infra::InMemoryMovieCache;

    const SETTLE: Duration = Duration::from_millis(250);

    async fn seeded(favorite: bool) -> (Arc<InMemoryMovieCache>, MovieSummary) {
        let cache = Arc::new(InMemoryMovieCache::new());
        let stored = movie("tt1", "A", "2000").with_favorite(favorite);
        cache.upsert(stored.clone()).await.unwrap();
        (cache, stored)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_toggles_persist_only_the_last_value() {
        let (cache, stored) = seeded(false).await;
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);
        coordinator.select(Some(stored));
        let writes_before = cache.write_count();

        let tickets: Vec<ToggleTicket> = (0..5).map(|_| coordinator.toggle(None)).collect();
        let mut outcomes = Vec::new();
        for ticket in tickets {
            outcomes.push(ticket.outcome().await);
        }

        assert_eq!(&outcomes[..4], &[ToggleOutcome::Cancelled; 4]);
        assert_eq!(outcomes[4], ToggleOutcome::Committed(true));
        assert_eq!(cache.write_count(), writes_before + 1);
        let persisted = cache.find_by_id(&MovieId::from("tt1")).await.unwrap().unwrap();
        assert!(persisted.is_favorite);
        assert!(coordinator.selection().borrow().as_ref().unwrap().is_favorite);
    }

    #[tokio::test(start_paused = true)]
    async fn even_number_of_rapid_toggles_restores_the_original_flag() {
        let (cache, stored) = seeded(true).await;
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);
        coordinator.select(Some(stored.clone()));

        coordinator.toggle(Some(stored.clone()));
        let last = coordinator.toggle(Some(stored));

        assert_eq!(last.outcome().await, ToggleOutcome::Committed(true));
        let persisted = cache.find_by_id(&MovieId::from("tt1")).await.unwrap().unwrap();
        assert!(persisted.is_favorite);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_selected_is_a_no_op() {
        let cache = Arc::new(InMemoryMovieCache::new());
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);

        assert_eq!(coordinator.toggle(None).outcome().await, ToggleOutcome::Skipped);
        assert_eq!(cache.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn uncached_movie_is_stored_with_the_new_flag() {
        let cache = Arc::new(InMemoryMovieCache::new());
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);
        let fresh = movie("tt7", "Fresh", "2020").with_search_term("fresh");

        let outcome = coordinator.toggle(Some(fresh.clone())).outcome().await;

        assert_eq!(outcome, ToggleOutcome::Committed(true));
        let stored = cache.find_by_id(fresh.id()).await.unwrap().unwrap();
        assert_eq!(stored, fresh.with_favorite(true));
    }

    #[tokio::test(start_paused = true)]
    async fn persistence_failure_keeps_the_optimistic_flag() {
        let (cache, stored) = seeded(false).await;
        cache.fail_writes(true);
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);
        coordinator.select(Some(stored));

        let outcome = coordinator.toggle(None).outcome().await;

        assert_eq!(outcome, ToggleOutcome::FailedSilently);
        assert!(coordinator.selection().borrow().as_ref().unwrap().is_favorite);
        let persisted = cache.find_by_id(&MovieId::from("tt1")).await.unwrap().unwrap();
        assert!(!persisted.is_favorite);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_movie_other_than_selection_leaves_selection_alone() {
        let (cache, selected) = seeded(false).await;
        let other = movie("tt2", "B", "2001");
        cache.upsert(other.clone()).await.unwrap();
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);
        coordinator.select(Some(selected));

        let outcome = coordinator.toggle(Some(other)).outcome().await;

        assert_eq!(outcome, ToggleOutcome::Committed(true));
        assert!(!coordinator.selection().borrow().as_ref().unwrap().is_favorite);
        let favorites = cache.list_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id(), &MovieId::from("tt2"));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_coordinator_cancels_the_pending_toggle() {
        let (cache, stored) = seeded(false).await;
        let coordinator = FavoriteToggleCoordinator::new(cache.clone(), SETTLE);
        let writes_before = cache.write_count();

        let ticket = coordinator.toggle(Some(stored));
        drop(coordinator);

        assert_eq!(ticket.outcome().await, ToggleOutcome::Cancelled);
        assert_eq!(cache.write_count(), writes_before);
    }

    #[tokio::test(start_paused = true)]
    async fn refreshed_list_highlights_the_pending_selection() {
        let (cache, stored) = seeded(false).await;
        let coordinator = FavoriteToggleCoordinator::new(cache, SETTLE);
        coordinator.select(Some(stored.clone()));
        let _ticket = coordinator.toggle(None);

        let mut refreshed = vec![movie("tt0", "Z", "1999"), stored.clone(), movie("tt2", "B", "2001")];
        refreshed[0].is_selected = true;

        assert_eq!(coordinator.restore_selection(&mut refreshed), Some(1));
        assert!(refreshed[1].is_selected);
        assert!(refreshed[1].is_favorite, "optimistic flag shown before it settles");
        assert!(!refreshed[0].is_selected);

        coordinator.select(None);
        assert_eq!(coordinator.restore_selection(&mut refreshed), None);
        assert!(refreshed.iter().all(|m| !m.is_selected));
    }
}
