use crate::error::SourceError;
use crate::omdb::api;
use crate::traits::MovieSource;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};
use watchlist_models::{MovieDetail, SearchResult};

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(api::create_omdb_client()),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(SourceError::MissingApiKey);
        }
        Ok(key)
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError> {
        let api_key = self.api_key()?;
        debug!(query = %query, "Searching OMDb");
        let results = api::search(&self.client, &self.api_url, api_key, query).await?;
        info!(query = %query, count = results.len(), "OMDb search finished");
        Ok(results)
    }

    async fn movie_details(&self, id: &str) -> Result<MovieDetail, SourceError> {
        let api_key = self.api_key()?;
        debug!(imdb_id = %id, "Fetching OMDb movie details");
        api::get_movie(&self.client, &self.api_url, api_key, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> Matcher {
        Matcher::AllOf(
            pairs
                .iter()
                .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_search_movie() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "Search": [{
                "Title": "Inception",
                "Year": "2010",
                "imdbID": "tt1375666",
                "Type": "movie",
                "Poster": "https://example.com/inception.jpg"
            }],
            "totalResults": "1",
            "Response": "True"
        });

        let mock = server
            .mock("GET", "/")
            .match_query(query(&[("apikey", "test"), ("s", "Inception")]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = OmdbClient::new(server.url(), "test");
        let results = client.search("Inception").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "tt1375666");
        assert_eq!(results[0].title, "Inception");
        assert_eq!(results[0].year, "2010");
    }

    #[tokio::test]
    async fn test_search_not_found_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(query(&[("s", "zzzzqqq")]))
            .with_status(200)
            .with_body(r#"{"Response":"False","Error":"Movie not found!"}"#)
            .create_async()
            .await;

        let client = OmdbClient::new(server.url(), "test");
        let err = client.search("zzzzqqq").await.unwrap_err();

        assert!(err.is_api_failure());
        assert_eq!(err.to_string(), "API error: Movie not found!");
    }

    #[tokio::test]
    async fn test_search_http_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = OmdbClient::new(server.url(), "test");
        let err = client.search("Inception").await.unwrap_err();

        assert!(matches!(err, SourceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_get_details() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "Title": "Inception",
            "Year": "2010",
            "Released": "16 Jul 2010",
            "Runtime": "148 min",
            "Genre": "Action, Adventure, Sci-Fi",
            "Director": "Christopher Nolan",
            "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
            "Plot": "A thief who steals corporate secrets...",
            "Poster": "N/A",
            "imdbRating": "8.8",
            "imdbID": "tt1375666",
            "Response": "True"
        });

        let _mock = server
            .mock("GET", "/")
            .match_query(query(&[("apikey", "test"), ("i", "tt1375666")]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = OmdbClient::new(server.url(), "test");
        let detail = client.movie_details("tt1375666").await.unwrap();

        assert_eq!(detail.title, "Inception");
        assert_eq!(detail.runtime_text, "148 min");
        assert_eq!(detail.imdb_rating, Some(8.8));
        assert_eq!(detail.poster_url, "");
        assert_eq!(detail.director, "Christopher Nolan");
    }

    #[tokio::test]
    async fn test_missing_api_key_skips_request() {
        let client = OmdbClient::new("http://127.0.0.1:9", "  ");
        let err = client.search("Inception").await.unwrap_err();
        assert!(matches!(err, SourceError::MissingApiKey));
    }
}
