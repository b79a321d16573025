use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use watchlist_models::SearchResult;
use watchlist_sources::{MovieSource, SourceError};

pub const NO_RESULTS_MESSAGE: &str = "No movies found";
pub const FETCH_FAILED_MESSAGE: &str = "Something went wrong with fetching movies";

/// Query-driven search state.
///
/// Each query change bumps a generation number and cancels the previous
/// request; completions from older generations are dropped in [`SearchLoader::apply`].
#[derive(Debug, Default)]
pub struct SearchLoader {
    query: String,
    results: Vec<SearchResult>,
    is_loading: bool,
    error: Option<String>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

/// A search to run off the event loop. Feed its completion back through `apply`.
#[derive(Debug)]
pub struct SearchRequest {
    generation: u64,
    query: String,
    token: CancellationToken,
}

#[derive(Debug)]
pub struct SearchCompletion {
    pub generation: u64,
    pub outcome: SearchOutcome,
}

#[derive(Debug)]
pub enum SearchOutcome {
    Found(Vec<SearchResult>),
    NotFound,
    Failed(String),
    Cancelled,
}

impl SearchRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub async fn run<S: MovieSource + ?Sized>(self, source: &S) -> SearchCompletion {
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => SearchOutcome::Cancelled,
            result = source.search(&self.query) => classify(&self.query, result),
        };

        SearchCompletion {
            generation: self.generation,
            outcome,
        }
    }
}

fn classify(query: &str, result: Result<Vec<SearchResult>, SourceError>) -> SearchOutcome {
    match result {
        Ok(results) if results.is_empty() => SearchOutcome::NotFound,
        Ok(results) => SearchOutcome::Found(results),
        Err(e) if e.is_api_failure() => SearchOutcome::NotFound,
        Err(SourceError::MissingApiKey) => SearchOutcome::Failed(SourceError::MissingApiKey.to_string()),
        Err(e) => {
            warn!(query = %query, error = %e, "Movie search failed");
            SearchOutcome::Failed(FETCH_FAILED_MESSAGE.to_string())
        }
    }
}

impl SearchLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the query. `on_change` runs on every change so the consumer
    /// can close whatever detail view is open.
    ///
    /// Returns the request to run, or `None` for a blank or unchanged query.
    pub fn set_query(
        &mut self,
        query: impl Into<String>,
        on_change: impl FnOnce(),
    ) -> Option<SearchRequest> {
        let query = query.into();
        if query == self.query {
            return None;
        }

        self.cancel_in_flight();
        self.generation += 1;
        self.query = query;
        on_change();

        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            self.results.clear();
            self.is_loading = false;
            self.error = None;
            return None;
        }

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.is_loading = true;
        self.error = None;

        debug!(query = %trimmed, generation = self.generation, "Issuing search");
        Some(SearchRequest {
            generation: self.generation,
            query: trimmed.to_string(),
            token,
        })
    }

    /// Apply a completed search. Returns false when it was superseded or cancelled.
    pub fn apply(&mut self, completion: SearchCompletion) -> bool {
        if completion.generation != self.generation {
            debug!(
                stale = completion.generation,
                current = self.generation,
                "Dropping superseded search result"
            );
            return false;
        }

        match completion.outcome {
            SearchOutcome::Cancelled => return false,
            SearchOutcome::Found(results) if results.is_empty() => {
                self.results.clear();
                self.error = Some(NO_RESULTS_MESSAGE.to_string());
            }
            SearchOutcome::Found(results) => {
                self.results = results;
                self.error = None;
            }
            SearchOutcome::NotFound => {
                self.results.clear();
                self.error = Some(NO_RESULTS_MESSAGE.to_string());
            }
            SearchOutcome::Failed(message) => {
                self.results.clear();
                self.error = Some(message);
            }
        }

        self.is_loading = false;
        self.in_flight = None;
        true
    }

    /// Abandon the current request, e.g. when the view goes away.
    pub fn cancel(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.is_loading = false;
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
