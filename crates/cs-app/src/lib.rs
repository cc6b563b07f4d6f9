//! cinesearch application layer
//!
//! Use cases that orchestrate the movie cache and the remote catalogue:
//! debounced search, favorite toggling, details loading and the favorites
//! feed. Everything here talks to infrastructure through `cs-core` ports.

pub mod app_paths;
pub mod ports;
pub mod state;
pub mod usecases;

pub use ports::{SearchStateSink, SearchUpdate};
pub use state::WatchSearchState;
pub use usecases::{
    DetailResult, FavoriteToggleCoordinator, ListFavorites, LoadMovieDetails, SearchMovies,
    SearchOrchestrator, SearchOutcome, SearchTicket, SetFavorite, ToggleOutcome, ToggleTicket,
};
