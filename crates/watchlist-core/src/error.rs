use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a detail view cannot be turned into a watched entry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("Movie details are not loaded")]
    NotReady,

    #[error("Rate the movie before adding it")]
    NoRating,

    #[error("{0} is already on the watched list")]
    AlreadyWatched(String),
}
