//! Wire format of the OMDb API. Field names follow the service verbatim.

use serde::Deserialize;

use cs_core::movie::{MediaType, MovieDetail, MovieSummary, Rating};
use cs_core::MovieId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchResponseDto {
    #[serde(default)]
    pub search: Option<Vec<SearchItemDto>>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SearchItemDto {
    pub title: String,
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub poster: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RatingDto {
    pub source: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetailResponseDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub rated: String,
    #[serde(default)]
    pub released: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub writer: String,
    #[serde(default)]
    pub actors: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub awards: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub ratings: Vec<RatingDto>,
    #[serde(default)]
    pub metascore: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes", default)]
    pub imdb_votes: String,
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchItemDto {
    pub fn into_summary(self) -> MovieSummary {
        MovieSummary::new(
            MovieId::from(self.imdb_id),
            self.title,
            self.year,
            MediaType::from(self.kind),
            self.poster,
        )
    }
}

impl DetailResponseDto {
    pub fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: MovieId::from(self.imdb_id),
            title: self.title,
            year: self.year,
            rated: self.rated,
            released: self.released,
            runtime: self.runtime,
            genre: self.genre,
            director: self.director,
            writer: self.writer,
            actors: self.actors,
            plot: self.plot,
            language: self.language,
            country: self.country,
            awards: self.awards,
            poster: self.poster,
            ratings: self
                .ratings
                .into_iter()
                .map(|r| Rating {
                    source: r.source,
                    value: r.value,
                })
                .collect(),
            metascore: self.metascore,
            imdb_rating: self.imdb_rating,
            imdb_votes: self.imdb_votes,
        }
    }
}

/// OMDb signals failures in-band with `"Response": "False"`.
pub(crate) fn is_success_flag(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}
