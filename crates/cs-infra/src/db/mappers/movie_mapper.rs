use crate::db::models::{MovieRow, NewMovieRow};
use crate::db::ports::{InsertMapper, RowMapper};
use anyhow::{anyhow, Result};
use chrono::Utc;
use cs_core::movie::{MediaType, MovieDetail, MovieSummary};
use cs_core::MovieId;

pub struct MovieRowMapper;

impl InsertMapper<MovieSummary, NewMovieRow> for MovieRowMapper {
    fn to_row(&self, domain: &MovieSummary) -> Result<NewMovieRow> {
        let details_json = match &domain.detail {
            Some(detail) => Some(serde_json::to_string(detail).map_err(|e| {
                anyhow!("failed to encode details of {}: {}", domain.id(), e)
            })?),
            None => None,
        };

        Ok(NewMovieRow {
            imdb_id: domain.id().as_str().to_string(),
            title: domain.title.clone(),
            year: domain.year.clone(),
            media_type: domain.media_type.as_str().to_string(),
            poster: domain.poster.clone(),
            search_term: domain.search_term.clone(),
            search_rank: 0,
            is_favorite: domain.is_favorite,
            details_json,
            updated_at: Utc::now().timestamp_millis(),
        })
    }
}

impl RowMapper<MovieRow, MovieSummary> for MovieRowMapper {
    fn to_domain(&self, row: &MovieRow) -> Result<MovieSummary> {
        let mut movie = MovieSummary::new(
            MovieId::from(row.imdb_id.as_str()),
            row.title.clone(),
            row.year.clone(),
            MediaType::from(row.media_type.as_str()),
            row.poster.clone(),
        )
        .with_search_term(row.search_term.clone())
        .with_favorite(row.is_favorite);

        movie.detail = details_from_json(row.details_json.as_deref(), &row.imdb_id);
        Ok(movie)
    }
}

/// Undecodable detail JSON is treated as "not fetched yet" so a bad column
/// never hides the summary row itself.
fn details_from_json(json: Option<&str>, imdb_id: &str) -> Option<MovieDetail> {
    let json = json?;
    match serde_json::from_str(json) {
        Ok(detail) => Some(detail),
        Err(e) => {
            tracing::warn!(imdb_id, error = %e, "discarding undecodable movie details");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(details_json: Option<&str>) -> MovieRow {
        MovieRow {
            imdb_id: "tt1".to_string(),
            title: "A".to_string(),
            year: "2000".to_string(),
            media_type: "series".to_string(),
            poster: "N/A".to_string(),
            search_term: "a".to_string(),
            search_rank: 3,
            is_favorite: true,
            details_json: details_json.map(str::to_string),
            updated_at: 0,
        }
    }

    #[test]
    fn row_maps_to_summary() {
        let movie = MovieRowMapper.to_domain(&row(None)).unwrap();
        assert_eq!(movie.id().as_str(), "tt1");
        assert_eq!(movie.media_type, MediaType::Series);
        assert_eq!(movie.search_term, "a");
        assert!(movie.is_favorite);
        assert!(movie.detail.is_none());
    }

    #[test]
    fn corrupt_details_are_dropped() {
        let movie = MovieRowMapper.to_domain(&row(Some("\"\""))).unwrap();
        assert!(movie.detail.is_none());
    }

    #[test]
    fn details_survive_the_json_column() {
        let mut detail = MovieDetail::new(MovieId::from("tt1"), "A", "2000");
        detail.plot = "Something happens.".to_string();
        let summary = MovieRowMapper
            .to_domain(&row(None))
            .unwrap()
            .with_detail(detail.clone());

        let new_row = MovieRowMapper.to_row(&summary).unwrap();
        let loaded = MovieRowMapper
            .to_domain(&row(new_row.details_json.as_deref()))
            .unwrap();

        assert_eq!(loaded.detail, Some(detail));
    }
}
