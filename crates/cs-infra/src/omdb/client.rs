use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use cs_core::movie::{MovieDetail, SearchPage};
use cs_core::ports::{MovieApiError, MovieApiPort};
use cs_core::MovieId;

use super::dto::{is_success_flag, DetailResponseDto, SearchResponseDto};

const UNKNOWN_ERROR: &str = "Unknown error from movie service";

/// reqwest client for the OMDb REST API.
///
/// Both operations are a `GET /` with the static API key plus either a
/// search (`s`) or an identifier (`i`) query parameter.
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, param: (&str, &str)) -> Result<T, MovieApiError> {
        let url = format!("{}/", self.base_url);
        tracing::debug!(%url, key = param.0, value = param.1, "omdb request");

        let response = self
            .http
            .get(&url)
            .query(&[("apikey", self.api_key.as_str()), param])
            .send()
            .await
            .map_err(|e| MovieApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %body, "omdb returned non-success status");
            return Err(MovieApiError::Response(if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                body
            }));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MovieApiError::Transport(format!("failed to decode response: {}", e)))
    }
}

#[async_trait]
impl MovieApiPort for OmdbClient {
    async fn search(&self, term: &str) -> Result<SearchPage, MovieApiError> {
        let dto: SearchResponseDto = self.get(("s", term)).await?;

        if !is_success_flag(&dto.response) {
            return Err(MovieApiError::Response(
                dto.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }

        let items = dto
            .search
            .ok_or_else(|| MovieApiError::Response(UNKNOWN_ERROR.to_string()))?;
        let movies: Vec<_> = items.into_iter().map(|item| item.into_summary()).collect();
        let total_results = dto
            .total_results
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(movies.len() as u32);

        Ok(SearchPage {
            movies,
            total_results,
        })
    }

    async fn details(&self, id: &MovieId) -> Result<MovieDetail, MovieApiError> {
        let dto: DetailResponseDto = self.get(("i", id.as_str())).await?;

        if !is_success_flag(&dto.response) {
            return Err(MovieApiError::Response(
                dto.error.clone().unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }

        let mut detail = dto.into_detail();
        if detail.id.as_str().is_empty() {
            detail.id = id.clone();
        }
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> OmdbClient {
        OmdbClient::new(server.url(), "test-key", Duration::from_secs(5)).unwrap()
    }

    fn query(key: &str, value: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test-key".into()),
            Matcher::UrlEncoded(key.into(), value.into()),
        ])
    }

    #[tokio::test]
    async fn search_maps_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(query("s", "the matrix"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"Search":[{"Title":"The Matrix","Year":"1999","imdbID":"tt0133093","Type":"movie","Poster":"N/A"}],"totalResults":"1","Response":"True"}"#,
            )
            .create_async()
            .await;

        let page = client(&server).search("the matrix").await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.total_results, 1);
        assert_eq!(page.movies[0].id().as_str(), "tt0133093");
        assert_eq!(page.movies[0].title, "The Matrix");
        assert!(!page.movies[0].is_favorite);
    }

    #[tokio::test]
    async fn false_response_flag_is_a_response_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"Response":"False","Error":"Movie not found!"}"#)
            .create_async()
            .await;

        let err = client(&server).search("zzzz").await.unwrap_err();

        assert_eq!(err, MovieApiError::Response("Movie not found!".to_string()));
    }

    #[tokio::test]
    async fn non_success_status_carries_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"Response":"False","Error":"Invalid API key!"}"#)
            .create_async()
            .await;

        let err = client(&server).search("x").await.unwrap_err();

        match err {
            MovieApiError::Response(body) => assert!(body.contains("Invalid API key!")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client(&server).search("x").await.unwrap_err();

        assert!(matches!(err, MovieApiError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let client = OmdbClient::new("http://127.0.0.1:9", "k", Duration::from_millis(500)).unwrap();

        let err = client.search("x").await.unwrap_err();

        assert!(matches!(err, MovieApiError::Transport(_)));
    }

    #[tokio::test]
    async fn details_maps_ratings() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(query("i", "tt0133093"))
            .with_status(200)
            .with_body(
                r#"{"Title":"The Matrix","Year":"1999","Plot":"A hacker learns the truth.","Ratings":[{"Source":"Internet Movie Database","Value":"8.7/10"}],"imdbRating":"8.7","imdbID":"tt0133093","Type":"movie","Response":"True"}"#,
            )
            .create_async()
            .await;

        let detail = client(&server)
            .details(&MovieId::from("tt0133093"))
            .await
            .unwrap();

        assert_eq!(detail.plot, "A hacker learns the truth.");
        assert_eq!(detail.ratings.len(), 1);
        assert_eq!(detail.ratings[0].value, "8.7/10");
        assert_eq!(detail.imdb_rating, "8.7");
    }
}
