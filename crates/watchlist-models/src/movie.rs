use serde::{Deserialize, Serialize};

/// Full record for a single movie, fetched on demand when it is selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub release_date: String,
    pub runtime_text: String, // As reported remotely, e.g. "148 min" or "N/A"
    pub imdb_rating: Option<f64>, // None when the source reports "N/A"
    pub plot: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}
