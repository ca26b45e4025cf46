//! Search orchestration: geocode, fetch, aggregate, one state machine.
//!
//! A search moves `Idle → Loading → {Populated, Empty, Failed}` and is
//! re-entrant: triggering a new search from any terminal state goes straight
//! back to Loading. All mutable presentation state lives here; the rest of
//! the crate is capability traits and pure functions.

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    aggregate::aggregate,
    error::ForecastError,
    model::{DailySummary, Notice, SearchState},
    provider::{ForecastFetcher, GeoResolver},
};

type StateObserver = Box<dyn Fn(&SearchState) + Send + Sync>;

/// What a pipeline run settles to, before it is committed to state.
enum PipelineOutcome {
    NoLocation,
    /// The fetcher's silent-failure path: no samples came back, and the
    /// prior summaries must stay exactly as they were.
    Silent,
    Daily(Vec<DailySummary>),
}

/// Owns [`SearchState`] and runs the resolve → fetch → aggregate pipeline.
///
/// Every `search()` call takes a fresh generation token; a pipeline whose
/// token is no longer current gets its commits discarded, so an overlapping
/// older search can never overwrite a newer one's result.
pub struct SearchController {
    resolver: Box<dyn GeoResolver>,
    fetcher: Box<dyn ForecastFetcher>,
    day_limit: usize,
    state: Mutex<SearchState>,
    generation: AtomicU64,
    observer: Option<StateObserver>,
}

impl SearchController {
    pub fn new(
        resolver: Box<dyn GeoResolver>,
        fetcher: Box<dyn ForecastFetcher>,
        day_limit: usize,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            day_limit,
            state: Mutex::new(SearchState::default()),
            generation: AtomicU64::new(0),
            observer: None,
        }
    }

    /// Subscribe the presentation layer to state transitions. The callback
    /// runs synchronously inside each commit, with the settled state.
    pub fn on_change(&mut self, observer: impl Fn(&SearchState) + Send + Sync + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.lock_state().clone()
    }

    /// Run one search for `city` and return the state it settled into.
    ///
    /// Empty/whitespace input short-circuits to the Empty outcome without
    /// touching the network. Loading is cleared on every exit path: the
    /// terminal commit runs whether the pipeline succeeded, found nothing,
    /// or failed.
    pub async fn search(&self, city: &str) -> SearchState {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let city = city.trim().to_string();

        self.commit(token, |st| {
            st.query_city = city.clone();
            st.is_loading = true;
            st.notice = None;
        });

        let outcome = if city.is_empty() {
            Ok(PipelineOutcome::NoLocation)
        } else {
            self.run_pipeline(&city).await
        };

        if let Err(err) = &outcome {
            tracing::warn!(error = %err, city = %city, "search pipeline failed");
        }

        self.commit(token, move |st| {
            st.is_loading = false;
            match outcome {
                Ok(PipelineOutcome::NoLocation) => {
                    st.summaries.clear();
                    st.notice = Some(Notice::NoLocationFound);
                }
                // No user-visible signal for a swallowed forecast failure;
                // summaries keep their pre-search value.
                Ok(PipelineOutcome::Silent) => {}
                Ok(PipelineOutcome::Daily(summaries)) => {
                    st.summaries = summaries;
                    st.notice = None;
                }
                // Summaries keep their prior value on failure.
                Err(_) => st.notice = Some(Notice::FetchFailed),
            }
        });

        self.state()
    }

    /// The typed pipeline: each step returns a result, failure
    /// short-circuits with `?`, no step mutates state.
    async fn run_pipeline(&self, city: &str) -> Result<PipelineOutcome, ForecastError> {
        let candidates = self.resolver.resolve(city).await?;

        let Some(first) = candidates.first() else {
            return Ok(PipelineOutcome::NoLocation);
        };

        let samples = self.fetcher.fetch(first.coord()).await?;
        if samples.is_empty() {
            // The fetcher swallows non-success statuses into an empty list;
            // a real forecast response always carries samples.
            return Ok(PipelineOutcome::Silent);
        }

        Ok(PipelineOutcome::Daily(aggregate(&samples, self.day_limit)))
    }

    /// Apply `update` to the state and notify the observer, unless the
    /// token has been superseded by a newer search.
    fn commit(&self, token: u64, update: impl FnOnce(&mut SearchState)) {
        let mut st = self.lock_state();
        if self.generation.load(Ordering::SeqCst) != token {
            tracing::debug!(token, "discarding commit from superseded search");
            return;
        }
        update(&mut st);
        if let Some(observer) = &self.observer {
            observer(&st);
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SearchState> {
        // State stays consistent even if an observer callback panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("resolver", &self.resolver)
            .field("fetcher", &self.fetcher)
            .field("day_limit", &self.day_limit)
            .finish_non_exhaustive()
    }
}
