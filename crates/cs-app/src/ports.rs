//! Ports owned by the application layer.

use cs_core::SearchResult;

/// One observable step of a search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchUpdate {
    /// Invocation counter; strictly increasing across `search` calls.
    pub generation: u64,
    pub term: String,
    pub result: SearchResult,
}

/// Receives search state transitions from the orchestrator.
///
/// Implementations must not block: `publish` is called while the
/// orchestrator holds its in-flight lock.
pub trait SearchStateSink: Send + Sync {
    fn publish(&self, update: SearchUpdate);
}
