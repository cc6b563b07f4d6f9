use serde::{Deserialize, Serialize};

use crate::ids::MovieId;

/// A single third-party rating (`{"Source": ..., "Value": ...}` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Descriptive record of a title.
///
/// Keyed by the same identifier as its owning [`MovieSummary`](super::MovieSummary)
/// and embedded in it once fetched. Serialized as JSON when stored alongside
/// the summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
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
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub metascore: String,
    #[serde(default)]
    pub imdb_rating: String,
    #[serde(default)]
    pub imdb_votes: String,
}

impl MovieDetail {
    /// Minimal detail with only the identifying fields set.
    pub fn new(id: MovieId, title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            year: year.into(),
            rated: String::new(),
            released: String::new(),
            runtime: String::new(),
            genre: String::new(),
            director: String::new(),
            writer: String::new(),
            actors: String::new(),
            plot: String::new(),
            language: String::new(),
            country: String::new(),
            awards: String::new(),
            poster: String::new(),
            ratings: Vec::new(),
            metascore: String::new(),
            imdb_rating: String::new(),
            imdb_votes: String::new(),
        }
    }
}
