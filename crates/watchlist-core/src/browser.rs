use crate::detail::{DetailCompletion, DetailRequest, DetailState, DetailView};
use crate::error::CommitError;
use crate::keys::{Action, Key, KeyBindings, Scope, Subscription};
use crate::loader::{SearchCompletion, SearchLoader, SearchRequest};
use crate::store::KeyValueStore;
use crate::watchlist::Watchlist;
use tracing::debug;
use watchlist_models::{SearchResult, UserRating, WatchedEntry, WatchedSummary};

/// Everything the screen shows, and the operations input maps onto.
///
/// Fetches are handed out as request values; the caller runs them and
/// passes the completions back in, so all mutation happens on one thread.
pub struct Browser<S: KeyValueStore> {
    loader: SearchLoader,
    detail: DetailView,
    watchlist: Watchlist<S>,
    keys: KeyBindings,
    search_focused: bool,
    results_open: bool,
    watched_open: bool,
    _search_binding: Subscription,
    escape_binding: Option<Subscription>,
}

impl<S: KeyValueStore> Browser<S> {
    pub fn new(watchlist: Watchlist<S>) -> Self {
        let keys = KeyBindings::new();
        let search_binding = keys.subscribe(Key::Enter, Action::FocusSearch, Scope::UnlessTyping);

        Self {
            loader: SearchLoader::new(),
            detail: DetailView::new(),
            watchlist,
            keys,
            search_focused: false,
            results_open: true,
            watched_open: true,
            _search_binding: search_binding,
            escape_binding: None,
        }
    }

    // Search

    pub fn query(&self) -> &str {
        self.loader.query()
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> Option<SearchRequest> {
        let detail = &mut self.detail;
        let request = self.loader.set_query(query, || detail.close());
        self.sync_escape_binding();
        request
    }

    pub fn apply_search(&mut self, completion: SearchCompletion) -> bool {
        self.loader.apply(completion)
    }

    pub fn results(&self) -> &[SearchResult] {
        self.loader.results()
    }

    pub fn num_results(&self) -> usize {
        self.loader.results().len()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.loader.error()
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn focus_search(&mut self) {
        self.search_focused = true;
    }

    pub fn blur_search(&mut self) {
        self.search_focused = false;
    }

    // Detail

    pub fn detail(&self) -> &DetailState {
        self.detail.state()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.detail.selected_id()
    }

    pub fn select_movie(&mut self, id: &str) -> Option<DetailRequest> {
        let request = self.detail.select(id);
        self.sync_escape_binding();
        request
    }

    pub fn apply_detail(&mut self, completion: DetailCompletion) -> bool {
        self.detail.apply(completion)
    }

    pub fn close_movie(&mut self) {
        self.detail.close();
        self.sync_escape_binding();
    }

    pub fn rate(&mut self, rating: UserRating) -> bool {
        self.detail.set_rating(rating)
    }

    /// Rating previously stored for the open movie, shown instead of the rating control
    pub fn rated_before(&self) -> Option<UserRating> {
        self.detail.rated_before(&self.watchlist)
    }

    pub fn add_watched(&mut self) -> Result<WatchedEntry, CommitError> {
        let result = self.detail.commit(&mut self.watchlist);
        self.sync_escape_binding();
        result
    }

    pub fn window_title(&self) -> String {
        self.detail.window_title()
    }

    // Watched list

    pub fn watched(&self) -> &[WatchedEntry] {
        self.watchlist.entries()
    }

    pub fn watchlist(&self) -> &Watchlist<S> {
        &self.watchlist
    }

    pub fn delete_watched(&mut self, id: &str) -> bool {
        self.watchlist.delete(id)
    }

    pub fn summary(&self) -> WatchedSummary {
        self.watchlist.summary()
    }

    // Panels

    pub fn results_open(&self) -> bool {
        self.results_open
    }

    pub fn watched_open(&self) -> bool {
        self.watched_open
    }

    pub fn toggle_results(&mut self) {
        self.results_open = !self.results_open;
    }

    pub fn toggle_watched(&mut self) {
        self.watched_open = !self.watched_open;
    }

    // Keys

    /// Run whatever is bound to `key` and report what happened.
    pub fn key_pressed(&mut self, key: Key) -> Vec<Action> {
        let actions = self.keys.dispatch(&key, self.search_focused);
        for action in &actions {
            debug!(?key, ?action, "Key action");
            match action {
                Action::FocusSearch => {
                    self.search_focused = true;
                    // A blank query never produces a request
                    let _ = self.set_query("");
                }
                Action::CloseDetail => self.close_movie(),
            }
        }
        actions
    }

    /// Escape is bound only while a detail view is open
    fn sync_escape_binding(&mut self) {
        match (self.detail.is_open(), self.escape_binding.is_some()) {
            (true, false) => {
                self.escape_binding =
                    Some(self.keys.subscribe(Key::Escape, Action::CloseDetail, Scope::Always));
            }
            (false, true) => self.escape_binding = None,
            _ => {}
        }
    }

    /// Drop in-flight work before the view goes away.
    pub fn shutdown(&mut self) {
        self.loader.cancel();
        self.close_movie();
    }
}

#[cfg(test)]
mod tests;
