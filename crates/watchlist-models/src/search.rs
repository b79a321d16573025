use serde::{Deserialize, Serialize};

/// One hit from the remote search endpoint. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub id: String, // IMDb id, e.g. "tt1375666"
    pub title: String,
    pub year: String, // Kept as text: series report ranges like "2008–2013"
    pub poster_url: String,
}
