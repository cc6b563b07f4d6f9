//! # cs-core
//!
//! Core domain models and port definitions for cinesearch.
//!
//! This crate contains pure domain logic without any infrastructure dependencies.

// Public module exports
pub mod app_dirs;
pub mod config;
pub mod ids;
pub mod movie;
pub mod ports;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::MovieId;
pub use movie::{
    mark_selected, MediaType, MovieDetail, MovieSummary, QueryResult, Rating, SearchPage,
    SearchResult,
};
