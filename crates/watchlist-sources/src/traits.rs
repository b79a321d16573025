use crate::error::SourceError;
use async_trait::async_trait;
use watchlist_models::{MovieDetail, SearchResult};

#[async_trait]
pub trait MovieSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Movies whose title matches `query`, in the order the source ranks them.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError>;

    /// Full record for one IMDb id.
    async fn movie_details(&self, id: &str) -> Result<MovieDetail, SourceError>;
}
