use async_trait::async_trait;
use tokio::sync::watch;

use crate::ids::MovieId;
use crate::movie::MovieSummary;

use super::errors::MovieCacheError;

/// Local store of every title seen so far, keyed by [`MovieId`].
///
/// Writes are upserts: the identifier is the primary key and the other
/// fields are replaced, except the favorite flag of an existing row, which
/// only [`set_favorite`](Self::set_favorite) changes. Concurrent writers
/// converge, last write wins.
#[async_trait]
pub trait MovieCachePort: Send + Sync {
    async fn upsert(&self, movie: MovieSummary) -> Result<(), MovieCacheError>;

    async fn upsert_many(&self, movies: Vec<MovieSummary>) -> Result<(), MovieCacheError>;

    async fn find_by_id(&self, id: &MovieId) -> Result<Option<MovieSummary>, MovieCacheError>;

    /// Entries for any of `ids`; missing identifiers are simply absent.
    async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<MovieSummary>, MovieCacheError>;

    /// Exact, case-sensitive match on the stored search term.
    async fn find_by_search_term(&self, term: &str)
        -> Result<Vec<MovieSummary>, MovieCacheError>;

    async fn list_favorites(&self) -> Result<Vec<MovieSummary>, MovieCacheError>;

    /// Favorites as an observable value, refreshed after every write.
    fn subscribe_favorites(&self) -> watch::Receiver<Vec<MovieSummary>>;

    /// Returns [`MovieCacheError::NotFound`] when no row has this id.
    async fn set_favorite(&self, id: &MovieId, favorite: bool) -> Result<(), MovieCacheError>;
}
