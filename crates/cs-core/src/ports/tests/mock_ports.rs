//! Mock implementations of the movie ports.
//!
//! Exercises the port signatures through `mockall` so that changes to the
//! traits are caught in this crate first.

use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;

use crate::ids::MovieId;
use crate::movie::{MediaType, MovieDetail, MovieSummary, SearchPage};
use crate::ports::{MovieApiError, MovieApiPort};

mock! {
    pub Api {}

    #[async_trait]
    impl MovieApiPort for Api {
        async fn search(&self, term: &str) -> Result<SearchPage, MovieApiError>;
        async fn details(&self, id: &MovieId) -> Result<MovieDetail, MovieApiError>;
    }
}

#[tokio::test]
async fn api_port_is_object_safe_and_mockable() {
    let mut api = MockApi::new();
    api.expect_search()
        .with(eq("matrix"))
        .times(1)
        .returning(|_| {
            Ok(SearchPage {
                movies: vec![MovieSummary::new(
                    MovieId::from("tt0133093"),
                    "The Matrix",
                    "1999",
                    MediaType::Movie,
                    "N/A",
                )],
                total_results: 1,
            })
        });
    api.expect_details()
        .returning(|_| Err(MovieApiError::Response("Incorrect IMDb ID.".to_string())));

    let port: &dyn MovieApiPort = &api;
    let page = port.search("matrix").await.unwrap();
    assert_eq!(page.movies.len(), 1);

    let err = port.details(&MovieId::from("bad")).await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect IMDb ID.");
}
