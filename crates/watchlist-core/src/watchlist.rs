use crate::store::KeyValueStore;
use tracing::{debug, info, warn};
use watchlist_models::{WatchedEntry, WatchedSummary};

/// Store slot holding the JSON snapshot of the watched list
pub const WATCHED_KEY: &str = "watched";
/// Where an unreadable snapshot is parked before starting over
pub const WATCHED_BACKUP_KEY: &str = "watched.bak";

/// The user's watched movies, mirrored to a key-value store.
///
/// Memory is authoritative once hydrated; every mutation rewrites the full
/// snapshot. Store failures are logged and otherwise ignored.
pub struct Watchlist<S: KeyValueStore> {
    entries: Vec<WatchedEntry>,
    store: S,
}

impl<S: KeyValueStore> Watchlist<S> {
    /// Seed from the store's snapshot. Missing or malformed data yields an
    /// empty list; the result is written back immediately.
    pub fn hydrate(mut store: S) -> Self {
        let entries = match store.get(WATCHED_KEY) {
            Ok(None) => {
                debug!("No watched snapshot found, starting empty");
                Vec::new()
            }
            Ok(Some(raw)) => match serde_json::from_str::<Vec<WatchedEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Watched snapshot is malformed, starting empty");
                    if let Err(backup_err) = store.set(WATCHED_BACKUP_KEY, raw) {
                        warn!(error = %backup_err, "Failed to back up malformed watched snapshot");
                    }
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Failed to read watched snapshot, starting empty");
                Vec::new()
            }
        };

        info!(count = entries.len(), "Watched list loaded");

        let mut watchlist = Self { entries, store };
        watchlist.persist();
        watchlist
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Appends without checking for an existing id; callers guard that.
    pub fn add(&mut self, entry: WatchedEntry) {
        debug!(imdb_id = %entry.id, "Adding watched entry");
        self.entries.push(entry);
        self.persist();
    }

    /// Returns whether anything was removed. The snapshot is rewritten either way.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!(imdb_id = %id, "Removed watched entry");
        }
        self.persist();
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&mut self) {
        let snapshot = match serde_json::to_string(&self.entries) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to serialize watched list");
                return;
            }
        };
        if let Err(e) = self.store.set(WATCHED_KEY, snapshot) {
            warn!(error = %e, "Failed to persist watched list");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use watchlist_models::{Runtime, UserRating};

    fn entry(id: &str, rating: u8) -> WatchedEntry {
        WatchedEntry {
            id: id.to_string(),
            title: format!("Movie {}", id),
            year: "2010".to_string(),
            poster_url: String::new(),
            imdb_rating: Some(7.5),
            user_rating: UserRating::new(rating).unwrap(),
            runtime: Runtime::Minutes(100),
            rating_revision_count: 1,
        }
    }

    fn snapshot<S: KeyValueStore>(watchlist: &Watchlist<S>) -> Vec<WatchedEntry> {
        let raw = watchlist.store().get(WATCHED_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_hydrate_missing_snapshot_writes_empty_list() {
        let watchlist = Watchlist::hydrate(MemoryStore::new());
        assert!(watchlist.is_empty());
        assert_eq!(watchlist.store().get(WATCHED_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_hydrate_malformed_snapshot_falls_back_to_empty() {
        let mut store = MemoryStore::new();
        store.set(WATCHED_KEY, "{oops".to_string()).unwrap();

        let watchlist = Watchlist::hydrate(store);
        assert!(watchlist.is_empty());
        assert_eq!(
            watchlist.store().get(WATCHED_BACKUP_KEY).unwrap().as_deref(),
            Some("{oops")
        );
    }

    #[test]
    fn test_hydrate_existing_snapshot() {
        let mut store = MemoryStore::new();
        let existing = vec![entry("tt001", 7), entry("tt002", 9)];
        store
            .set(WATCHED_KEY, serde_json::to_string(&existing).unwrap())
            .unwrap();

        let watchlist = Watchlist::hydrate(store);
        assert_eq!(watchlist.entries(), existing.as_slice());
    }

    #[test]
    fn test_add_then_delete_restores_previous_state() {
        let mut watchlist = Watchlist::hydrate(MemoryStore::new());
        watchlist.add(entry("tt001", 8));
        let before = watchlist.entries().to_vec();

        watchlist.add(entry("tt002", 6));
        assert!(watchlist.delete("tt002"));

        assert_eq!(watchlist.entries(), before.as_slice());
        assert_eq!(snapshot(&watchlist), before);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut watchlist = Watchlist::hydrate(MemoryStore::new());
        watchlist.add(entry("tt001", 8));
        assert!(!watchlist.delete("tt999"));
        assert_eq!(watchlist.len(), 1);
    }

    #[test]
    fn test_snapshot_matches_memory_after_mutations() {
        let mut watchlist = Watchlist::hydrate(MemoryStore::new());
        watchlist.add(entry("tt001", 8));
        watchlist.add(entry("tt002", 5));
        watchlist.add(entry("tt003", 10));
        watchlist.delete("tt001");
        watchlist.add(entry("tt004", 3));
        watchlist.delete("tt003");

        assert_eq!(snapshot(&watchlist), watchlist.entries());
        let ids: Vec<&str> = watchlist.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tt002", "tt004"]);
    }

    #[test]
    fn test_add_does_not_deduplicate() {
        let mut watchlist = Watchlist::hydrate(MemoryStore::new());
        watchlist.add(entry("tt001", 8));
        watchlist.add(entry("tt001", 4));
        assert_eq!(watchlist.len(), 2);
        // delete drops every entry with the id
        watchlist.delete("tt001");
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_file_backed_watchlist_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watched.json");

        {
            let mut watchlist = Watchlist::hydrate(FileStore::open(&path).unwrap());
            watchlist.add(entry("tt1375666", 9));
        }

        let watchlist = Watchlist::hydrate(FileStore::open(&path).unwrap());
        assert_eq!(watchlist.len(), 1);
        assert_eq!(watchlist.get("tt1375666").unwrap().user_rating.get(), 9);
    }

    #[test]
    fn test_clear() {
        let mut watchlist = Watchlist::hydrate(MemoryStore::new());
        watchlist.add(entry("tt001", 8));
        watchlist.clear();
        assert!(watchlist.is_empty());
        assert!(snapshot(&watchlist).is_empty());
    }
}
