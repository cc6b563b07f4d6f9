use std::sync::Arc;

use tokio::sync::watch;

use cs_core::movie::MovieSummary;
use cs_core::ports::{MovieCacheError, MovieCachePort};

/// Read side of the favorites list.
pub struct ListFavorites {
    cache: Arc<dyn MovieCachePort>,
}

impl ListFavorites {
    pub fn new(cache: Arc<dyn MovieCachePort>) -> Self {
        Self { cache }
    }

    pub async fn snapshot(&self) -> Result<Vec<MovieSummary>, MovieCacheError> {
        self.cache.list_favorites().await
    }

    /// Live view; the cache refreshes it after every write.
    pub fn subscribe(&self) -> watch::Receiver<Vec<MovieSummary>> {
        self.cache.subscribe_favorites()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_support::movie;
    use cs_core::MovieId;
    use cs_infra::InMemoryMovieCache;

    #[tokio::test]
    async fn feed_follows_favorite_writes() {
        let cache = Arc::new(InMemoryMovieCache::new());
        cache
            .upsert_many(vec![movie("tt1", "A", "2000"), movie("tt2", "B", "2001")])
            .await
            .unwrap();
        let usecase = ListFavorites::new(cache.clone());
        let mut feed = usecase.subscribe();
        assert!(usecase.snapshot().await.unwrap().is_empty());

        cache.set_favorite(&MovieId::from("tt2"), true).await.unwrap();

        feed.changed().await.unwrap();
        let favorites = feed.borrow_and_update().clone();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id(), &MovieId::from("tt2"));
        assert_eq!(usecase.snapshot().await.unwrap(), favorites);
    }
}
