use async_trait::async_trait;

use crate::ids::MovieId;
use crate::movie::{MovieDetail, SearchPage};

use super::errors::MovieApiError;

/// Remote movie catalogue.
#[async_trait]
pub trait MovieApiPort: Send + Sync {
    /// Free-text title search.
    async fn search(&self, term: &str) -> Result<SearchPage, MovieApiError>;

    /// Full record of a single title.
    async fn details(&self, id: &MovieId) -> Result<MovieDetail, MovieApiError>;
}
