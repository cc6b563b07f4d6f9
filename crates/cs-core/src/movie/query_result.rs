use super::MovieSummary;

/// Observable state of a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult<T> {
    /// Work has started, no data yet.
    Pending,
    Ready(T),
    /// Human-readable description of what went wrong.
    Failed(String),
}

/// Result of a title search.
pub type SearchResult = QueryResult<Vec<MovieSummary>>;

impl<T> QueryResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryResult::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryResult::Ready(value) => Some(value),
            _ => None,
        }
    }
}
