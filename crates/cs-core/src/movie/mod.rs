//! Movie domain model.

mod detail;
mod media_type;
mod query_result;
mod summary;

pub use detail::{MovieDetail, Rating};
pub use media_type::MediaType;
pub use query_result::{QueryResult, SearchResult};
pub use summary::{mark_selected, MovieSummary, SearchPage};
