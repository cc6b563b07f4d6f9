//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure
//! implementations, so the search and favorites logic never depends on
//! diesel or reqwest directly.

pub mod app_dirs;
pub mod errors;
mod movie_api;
mod movie_cache;

#[cfg(test)]
mod tests;

pub use app_dirs::AppDirsPort;
pub use errors::{AppDirsError, MovieApiError, MovieCacheError};
pub use movie_api::MovieApiPort;
pub use movie_cache::MovieCachePort;
