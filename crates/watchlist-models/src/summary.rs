use crate::watched::WatchedEntry;
use serde::Serialize;

/// Aggregates shown above the watched list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime_minutes: f64,
}

impl WatchedSummary {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        // Entries without an IMDb rating are left out of that average only
        let imdb: Vec<f64> = entries.iter().filter_map(|e| e.imdb_rating).collect();
        let user: Vec<f64> = entries.iter().map(|e| f64::from(e.user_rating.get())).collect();
        let runtime: Vec<f64> = entries
            .iter()
            .map(|e| f64::from(e.runtime.minutes().unwrap_or(0)))
            .collect();

        Self {
            count: entries.len(),
            avg_imdb_rating: average(&imdb),
            avg_user_rating: average(&user),
            avg_runtime_minutes: average(&runtime),
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
