use serde::{Deserialize, Serialize};

use super::{MediaType, MovieDetail};
use crate::ids::MovieId;

/// A search hit, as cached locally.
///
/// The identifier is fixed at construction. After the first write to the
/// cache only `is_favorite` and `detail` are expected to change; everything
/// else is replaced wholesale when the catalogue returns the title again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    id: MovieId,
    pub title: String,
    pub year: String,
    pub media_type: MediaType,
    pub poster: String,
    /// The search term that produced this entry.
    pub search_term: String,
    pub is_favorite: bool,
    /// UI-only highlight, never persisted.
    #[serde(skip)]
    pub is_selected: bool,
    pub detail: Option<MovieDetail>,
}

impl MovieSummary {
    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        year: impl Into<String>,
        media_type: MediaType,
        poster: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            year: year.into(),
            media_type,
            poster: poster.into(),
            search_term: String::new(),
            is_favorite: false,
            is_selected: false,
            detail: None,
        }
    }

    pub fn id(&self) -> &MovieId {
        &self.id
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_favorite(mut self, favorite: bool) -> Self {
        self.is_favorite = favorite;
        self
    }

    pub fn with_detail(mut self, detail: MovieDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Carry locally owned state over from a previously stored copy of the
    /// same title: a set favorite flag and an already fetched detail.
    pub fn retain_local_state(&mut self, stored: &MovieSummary) {
        if stored.id != self.id {
            return;
        }
        if stored.is_favorite {
            self.is_favorite = true;
        }
        if self.detail.is_none() {
            self.detail = stored.detail.clone();
        }
    }
}

/// One page of search hits from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub movies: Vec<MovieSummary>,
    pub total_results: u32,
}

/// Flag the entry matching `selected` (and only that one) as selected.
///
/// Returns the position of the selected entry, if present.
pub fn mark_selected(movies: &mut [MovieSummary], selected: Option<&MovieId>) -> Option<usize> {
    let mut position = None;
    for (index, movie) in movies.iter_mut().enumerate() {
        movie.is_selected = selected == Some(movie.id());
        if movie.is_selected {
            position = Some(index);
        }
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> MovieSummary {
        MovieSummary::new(MovieId::from(id), "Title", "1999", MediaType::Movie, "N/A")
    }

    #[test]
    fn retain_local_state_keeps_favorite_and_detail() {
        let stored = summary("tt1")
            .with_favorite(true)
            .with_detail(MovieDetail::new(MovieId::from("tt1"), "Title", "1999"));
        let mut fresh = summary("tt1").with_search_term("new term");

        fresh.retain_local_state(&stored);

        assert!(fresh.is_favorite);
        assert!(fresh.detail.is_some());
        assert_eq!(fresh.search_term, "new term");
    }

    #[test]
    fn retain_local_state_ignores_other_titles() {
        let stored = summary("tt2").with_favorite(true);
        let mut fresh = summary("tt1");

        fresh.retain_local_state(&stored);

        assert!(!fresh.is_favorite);
    }

    #[test]
    fn selected_flag_is_not_serialized() {
        let mut movie = summary("tt1");
        movie.is_selected = true;

        let json = serde_json::to_string(&movie).unwrap();
        let back: MovieSummary = serde_json::from_str(&json).unwrap();

        assert!(!json.contains("is_selected"));
        assert!(!back.is_selected);
    }

    #[test]
    fn mark_selected_flags_exactly_one_entry() {
        let mut movies = vec![summary("tt1"), summary("tt2"), summary("tt3")];
        movies[0].is_selected = true;

        let position = mark_selected(&mut movies, Some(&MovieId::from("tt2")));

        assert_eq!(position, Some(1));
        assert_eq!(
            movies.iter().filter(|m| m.is_selected).count(),
            1,
            "stale selection must be cleared"
        );
        assert_eq!(mark_selected(&mut movies, None), None);
        assert!(movies.iter().all(|m| !m.is_selected));
    }
}
