pub mod favorites;
pub mod load_movie_details;
pub mod search_movies;
pub mod search_orchestrator;

pub use favorites::{
    FavoriteToggleCoordinator, ListFavorites, SetFavorite, ToggleOutcome, ToggleTicket,
};
pub use load_movie_details::{DetailResult, LoadMovieDetails};
pub use search_movies::{SearchMovies, SearchOutcome};
pub use search_orchestrator::{SearchOrchestrator, SearchTicket};

#[cfg(test)]
pub(crate) mod test_support;
