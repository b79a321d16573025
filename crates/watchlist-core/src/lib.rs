pub mod browser;
pub mod detail;
pub mod error;
pub mod keys;
pub mod loader;
pub mod store;
pub mod watchlist;

pub use browser::Browser;
pub use detail::{DetailCompletion, DetailOutcome, DetailRequest, DetailState, DetailView, ReadyDetail};
pub use error::{CommitError, StoreError};
pub use keys::{Action, Key, KeyBindings, Scope, Subscription};
pub use loader::{SearchCompletion, SearchLoader, SearchOutcome, SearchRequest, FETCH_FAILED_MESSAGE, NO_RESULTS_MESSAGE};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use watchlist::{Watchlist, WATCHED_KEY};
