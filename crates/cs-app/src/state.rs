use tokio::sync::watch;

use cs_core::QueryResult;

use crate::ports::{SearchStateSink, SearchUpdate};

/// Single-slot search state: observers attaching late see the latest value
/// only, intermediate values may be skipped.
pub struct WatchSearchState {
    tx: watch::Sender<SearchUpdate>,
}

impl Default for WatchSearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchSearchState {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SearchUpdate {
            generation: 0,
            term: String::new(),
            result: QueryResult::Ready(Vec::new()),
        });
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchUpdate> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SearchUpdate {
        self.tx.borrow().clone()
    }
}

impl SearchStateSink for WatchSearchState {
    fn publish(&self, update: SearchUpdate) {
        self.tx.send_replace(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_subscribers_see_only_the_latest_update() {
        let state = WatchSearchState::new();
        state.publish(SearchUpdate {
            generation: 1,
            term: "a".to_string(),
            result: QueryResult::Pending,
        });
        state.publish(SearchUpdate {
            generation: 1,
            term: "a".to_string(),
            result: QueryResult::Failed("boom".to_string()),
        });

        let rx = state.subscribe();
        assert_eq!(rx.borrow().result, QueryResult::Failed("boom".to_string()));
        assert_eq!(state.current().generation, 1);
    }
}
