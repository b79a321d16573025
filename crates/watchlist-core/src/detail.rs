use crate::error::CommitError;
use crate::store::KeyValueStore;
use crate::watchlist::Watchlist;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use watchlist_models::{MovieDetail, Runtime, UserRating, WatchedEntry};
use watchlist_sources::MovieSource;

pub const DEFAULT_TITLE: &str = "Watchlist+";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Idle,
    Loading { id: String },
    Ready(ReadyDetail),
    Failed { id: String, message: String },
}

/// A loaded movie plus the rating the user is composing for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyDetail {
    pub detail: MovieDetail,
    pub user_rating: Option<UserRating>,
    pub revisions: u32, // Rating changes made since this movie was selected
}

#[derive(Debug)]
pub struct DetailRequest {
    generation: u64,
    id: String,
    token: CancellationToken,
}

#[derive(Debug)]
pub struct DetailCompletion {
    pub generation: u64,
    pub outcome: DetailOutcome,
}

#[derive(Debug)]
pub enum DetailOutcome {
    Loaded(MovieDetail),
    Failed(String),
    Cancelled,
}

impl DetailRequest {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn run<S: MovieSource + ?Sized>(self, source: &S) -> DetailCompletion {
        let outcome = tokio::select! {
            biased;
            _ = self.token.cancelled() => DetailOutcome::Cancelled,
            result = source.movie_details(&self.id) => match result {
                Ok(detail) => DetailOutcome::Loaded(detail),
                Err(e) => {
                    warn!(imdb_id = %self.id, error = %e, "Failed to load movie details");
                    DetailOutcome::Failed(e.to_string())
                }
            },
        };

        DetailCompletion {
            generation: self.generation,
            outcome,
        }
    }
}

/// Detail pane for the selected movie: `Idle -> Loading -> Ready`, back to
/// `Idle` on close or when another movie is picked.
#[derive(Debug)]
pub struct DetailView {
    state: DetailState,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl Default for DetailView {
    fn default() -> Self {
        Self {
            state: DetailState::Idle,
            generation: 0,
            in_flight: None,
        }
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DetailState::Idle)
    }

    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            DetailState::Idle => None,
            DetailState::Loading { id } | DetailState::Failed { id, .. } => Some(id),
            DetailState::Ready(ready) => Some(&ready.detail.id),
        }
    }

    /// Pick a movie. Picking the one already shown closes the view instead.
    pub fn select(&mut self, id: &str) -> Option<DetailRequest> {
        if self.selected_id() == Some(id) {
            self.close();
            return None;
        }

        self.cancel_in_flight();
        self.generation += 1;
        self.state = DetailState::Loading { id: id.to_string() };

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        debug!(imdb_id = %id, generation = self.generation, "Loading movie details");
        Some(DetailRequest {
            generation: self.generation,
            id: id.to_string(),
            token,
        })
    }

    pub fn close(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.state = DetailState::Idle;
    }

    /// Returns false when the completion belongs to an earlier selection.
    pub fn apply(&mut self, completion: DetailCompletion) -> bool {
        if completion.generation != self.generation {
            debug!(
                stale = completion.generation,
                current = self.generation,
                "Dropping superseded movie details"
            );
            return false;
        }

        let id = match &self.state {
            DetailState::Loading { id } => id.clone(),
            _ => return false,
        };

        match completion.outcome {
            DetailOutcome::Cancelled => return false,
            DetailOutcome::Loaded(mut detail) => {
                detail.id = id;
                self.state = DetailState::Ready(ReadyDetail {
                    detail,
                    user_rating: None,
                    revisions: 0,
                });
            }
            DetailOutcome::Failed(message) => {
                self.state = DetailState::Failed { id, message };
            }
        }

        self.in_flight = None;
        true
    }

    /// Set the star rating. Only a change of value counts as a revision.
    pub fn set_rating(&mut self, rating: UserRating) -> bool {
        match &mut self.state {
            DetailState::Ready(ready) => {
                if ready.user_rating != Some(rating) {
                    ready.user_rating = Some(rating);
                    ready.revisions += 1;
                }
                true
            }
            _ => false,
        }
    }

    /// The rating stored earlier if the selected movie is already watched.
    pub fn rated_before<S: KeyValueStore>(&self, watchlist: &Watchlist<S>) -> Option<UserRating> {
        let id = self.selected_id()?;
        watchlist.get(id).map(|entry| entry.user_rating)
    }

    /// Turn the rated movie into a watched entry, add it, and close the view.
    pub fn commit<S: KeyValueStore>(
        &mut self,
        watchlist: &mut Watchlist<S>,
    ) -> Result<WatchedEntry, CommitError> {
        let ready = match &self.state {
            DetailState::Ready(ready) => ready,
            _ => return Err(CommitError::NotReady),
        };
        let user_rating = ready.user_rating.ok_or(CommitError::NoRating)?;
        if watchlist.contains(&ready.detail.id) {
            return Err(CommitError::AlreadyWatched(ready.detail.id.clone()));
        }

        let detail = &ready.detail;
        let entry = WatchedEntry {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            imdb_rating: detail.imdb_rating,
            user_rating,
            runtime: Runtime::parse(&detail.runtime_text),
            rating_revision_count: ready.revisions,
        };

        watchlist.add(entry.clone());
        info!(imdb_id = %entry.id, rating = %entry.user_rating, "Added movie to watched list");
        self.close();
        Ok(entry)
    }

    pub fn window_title(&self) -> String {
        match &self.state {
            DetailState::Ready(ready) if !ready.detail.title.is_empty() => {
                format!("Movie | {}", ready.detail.title)
            }
            _ => DEFAULT_TITLE.to_string(),
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
