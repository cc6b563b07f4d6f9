//! Shared doubles for use-case tests.

use async_trait::async_trait;
use mockall::mock;

use cs_core::movie::{MediaType, MovieDetail, MovieSummary, SearchPage};
use cs_core::ports::{MovieApiError, MovieApiPort};
use cs_core::MovieId;

mock! {
    pub Api {}

    #[async_trait]
    impl MovieApiPort for Api {
        async fn search(&self, term: &str) -> Result<SearchPage, MovieApiError>;
        async fn details(&self, id: &MovieId) -> Result<MovieDetail, MovieApiError>;
    }
}

pub fn movie(id: &str, title: &str, year: &str) -> MovieSummary {
    MovieSummary::new(MovieId::from(id), title, year, MediaType::Movie, "N/A")
}

pub fn page(movies: Vec<MovieSummary>) -> SearchPage {
    let total_results = movies.len() as u32;
    SearchPage {
        movies,
        total_results,
    }
}
