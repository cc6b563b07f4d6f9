use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use cs_core::QueryResult;

use super::search_movies::{SearchMovies, SearchOutcome};
use crate::ports::{SearchStateSink, SearchUpdate};

struct InFlight {
    generation: u64,
    cancel: CancellationToken,
}

/// Debounced, single-flight front of [`SearchMovies`].
///
/// Each call to [`search`](Self::search) supersedes the previous one: its
/// debounce window or running flow is cancelled and none of its later
/// updates reach the sink. Must be used inside a Tokio runtime.
pub struct SearchOrchestrator {
    search: Arc<SearchMovies>,
    debounce: Duration,
    sink: Arc<dyn SearchStateSink>,
    in_flight: Arc<Mutex<InFlight>>,
}

/// Handle on one `search` invocation.
pub struct SearchTicket {
    generation: u64,
    done: oneshot::Receiver<SearchOutcome>,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the invocation to finish. `None` if the orchestrator went
    /// away before the flow could report.
    pub async fn finished(self) -> Option<SearchOutcome> {
        self.done.await.ok()
    }
}

impl SearchOrchestrator {
    pub fn new(search: SearchMovies, debounce: Duration, sink: Arc<dyn SearchStateSink>) -> Self {
        Self {
            search: Arc::new(search),
            debounce,
            sink,
            in_flight: Arc::new(Mutex::new(InFlight {
                generation: 0,
                cancel: CancellationToken::new(),
            })),
        }
    }

    pub fn search(&self, term: &str) -> SearchTicket {
        let term = term.to_string();
        let (done_tx, done) = oneshot::channel();

        let mut slot = lock(&self.in_flight);
        slot.cancel.cancel();
        slot.generation += 1;
        let generation = slot.generation;
        let cancel = CancellationToken::new();
        slot.cancel = cancel.clone();

        if term.trim().is_empty() {
            // Cleared input: answer immediately, no debounce, no I/O.
            self.sink.publish(SearchUpdate {
                generation,
                term,
                result: QueryResult::Ready(Vec::new()),
            });
            let _ = done_tx.send(SearchOutcome::Blank);
            return SearchTicket { generation, done };
        }
        drop(slot);

        tracing::debug!(generation, term = %term, "search scheduled");

        let search = self.search.clone();
        let sink = self.sink.clone();
        let in_flight = self.in_flight.clone();
        let debounce = self.debounce;

        tokio::spawn(async move {
            if cancel
                .run_until_cancelled(tokio::time::sleep(debounce))
                .await
                .is_none()
            {
                tracing::debug!(generation, "search superseded during debounce");
                let _ = done_tx.send(SearchOutcome::Cancelled);
                return;
            }

            let label = term.clone();
            let publish = move |result| {
                let slot = lock(&in_flight);
                if slot.generation != generation {
                    return;
                }
                sink.publish(SearchUpdate {
                    generation,
                    term: label.clone(),
                    result,
                });
            };

            let outcome = search.execute(&term, &cancel, publish).await;
            tracing::debug!(generation, ?outcome, "search finished");
            let _ = done_tx.send(outcome);
        });

        SearchTicket { generation, done }
    }

    /// Drops the in-flight search, if any, without starting a new one.
    ///
    /// Nothing from the dropped search reaches the sink once this returns.
    pub fn cancel(&self) {
        let mut slot = lock(&self.in_flight);
        slot.cancel.cancel();
        slot.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        lock(&self.in_flight).generation
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(in_flight: &Mutex<InFlight>) -> MutexGuard<'_, InFlight> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}
