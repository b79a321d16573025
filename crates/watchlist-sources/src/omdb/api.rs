use crate::error::SourceError;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use watchlist_models::{MovieDetail, SearchResult};

pub fn create_omdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("watchlist-plus/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// OMDb reports missing values as the literal "N/A"
fn or_empty(value: Option<String>) -> String {
    match value {
        Some(v) if v != "N/A" => v,
        _ => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbMovie {
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "Released", default)]
    released: Option<String>,
    #[serde(rename = "Runtime", default)]
    runtime: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Plot", default)]
    plot: Option<String>,
    #[serde(rename = "Actors", default)]
    actors: Option<String>,
    #[serde(rename = "Director", default)]
    director: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
}

impl From<OmdbSearchItem> for SearchResult {
    fn from(item: OmdbSearchItem) -> Self {
        SearchResult {
            id: item.imdb_id,
            title: or_empty(item.title),
            year: or_empty(item.year),
            poster_url: or_empty(item.poster),
        }
    }
}

impl OmdbMovie {
    fn into_detail(self, requested_id: &str) -> MovieDetail {
        let imdb_rating = self
            .imdb_rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok());

        MovieDetail {
            // Older records occasionally omit the id; fall back to what was asked for
            id: self
                .imdb_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| requested_id.to_string()),
            title: or_empty(self.title),
            year: or_empty(self.year),
            poster_url: or_empty(self.poster),
            release_date: or_empty(self.released),
            runtime_text: or_empty(self.runtime),
            imdb_rating,
            plot: or_empty(self.plot),
            actors: or_empty(self.actors),
            director: or_empty(self.director),
            genre: or_empty(self.genre),
        }
    }
}

fn is_false(response: &Option<String>) -> bool {
    response
        .as_deref()
        .map(|r| r.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status { status, body });
    }
    Ok(response.json().await?)
}

/// Search OMDb by title (`s=` parameter)
pub async fn search(
    client: &Client,
    api_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResult>, SourceError> {
    let response = client
        .get(api_url)
        .query(&[("apikey", api_key), ("s", query)])
        .send()
        .await?;

    let page: OmdbSearchResponse = read_json(response).await?;

    if is_false(&page.response) {
        let message = page.error.unwrap_or_else(|| "Movie not found!".to_string());
        debug!(query = %query, error = %message, "OMDb search reported failure");
        return Err(SourceError::Api(message));
    }

    Ok(page.search.into_iter().map(SearchResult::from).collect())
}

/// Fetch one record by IMDb id (`i=` parameter)
pub async fn get_movie(
    client: &Client,
    api_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetail, SourceError> {
    let response = client
        .get(api_url)
        .query(&[("apikey", api_key), ("i", id)])
        .send()
        .await?;

    let movie: OmdbMovie = read_json(response).await?;

    if is_false(&movie.response) {
        let message = movie.error.clone().unwrap_or_else(|| "Incorrect IMDb ID.".to_string());
        return Err(SourceError::Api(message));
    }

    Ok(movie.into_detail(id))
}
