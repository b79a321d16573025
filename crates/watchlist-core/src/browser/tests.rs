use super::*;
use crate::loader::{NO_RESULTS_MESSAGE, SearchOutcome};
use crate::store::MemoryStore;
use crate::watchlist::WATCHED_KEY;
use mockito::Matcher;
use serde_json::json;
use watchlist_models::Runtime;
use watchlist_sources::OmdbClient;

fn browser() -> Browser<MemoryStore> {
    Browser::new(Watchlist::hydrate(MemoryStore::new()))
}

fn stored_entries(browser: &Browser<MemoryStore>) -> Vec<WatchedEntry> {
    let raw = browser.watchlist().store().get(WATCHED_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

async fn mock_inception(server: &mut mockito::ServerGuard) -> (mockito::Mock, mockito::Mock) {
    let search = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test".into()),
            Matcher::UrlEncoded("s".into(), "Inception".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "Search": [{
                    "Title": "Inception",
                    "Year": "2010",
                    "imdbID": "tt1375666",
                    "Type": "movie",
                    "Poster": "https://example.com/inception.jpg"
                }],
                "totalResults": "1",
                "Response": "True"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let details = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apikey".into(), "test".into()),
            Matcher::UrlEncoded("i".into(), "tt1375666".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "Title": "Inception",
                "Year": "2010",
                "Released": "16 Jul 2010",
                "Runtime": "148 min",
                "Genre": "Action, Adventure, Sci-Fi",
                "Director": "Christopher Nolan",
                "Actors": "Leonardo DiCaprio",
                "Plot": "A thief who steals corporate secrets...",
                "Poster": "https://example.com/inception.jpg",
                "imdbRating": "8.8",
                "imdbID": "tt1375666",
                "Response": "True"
            })
            .to_string(),
        )
        .create_async()
        .await;

    (search, details)
}

#[tokio::test]
async fn test_search_select_rate_and_add() {
    let mut server = mockito::Server::new_async().await;
    let (search_mock, details_mock) = mock_inception(&mut server).await;
    let source = OmdbClient::new(server.url(), "test");
    let mut browser = browser();

    let request = browser.set_query("Inception").unwrap();
    let completion = request.run(&source).await;
    assert!(browser.apply_search(completion));
    assert_eq!(browser.num_results(), 1);
    assert_eq!(browser.results()[0].id, "tt1375666");
    assert_eq!(browser.results()[0].year, "2010");

    let request = browser.select_movie("tt1375666").unwrap();
    let completion = request.run(&source).await;
    assert!(browser.apply_detail(completion));
    assert_eq!(browser.window_title(), "Movie | Inception");
    assert_eq!(browser.rated_before(), None);

    assert!(browser.rate(UserRating::new(9).unwrap()));
    let entry = browser.add_watched().unwrap();

    search_mock.assert_async().await;
    details_mock.assert_async().await;

    assert_eq!(entry.id, "tt1375666");
    assert_eq!(entry.user_rating.get(), 9);
    assert_eq!(entry.rating_revision_count, 1);
    assert_eq!(entry.runtime, Runtime::Minutes(148));
    assert_eq!(browser.watched(), &[entry.clone()]);
    assert!(browser.selected_id().is_none());
    assert_eq!(stored_entries(&browser), vec![entry]);
}

#[tokio::test]
async fn test_api_false_response_shows_no_movies_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("s".into(), "qwzx".into()))
        .with_status(200)
        .with_body(r#"{"Response":"False","Error":"Movie not found!"}"#)
        .create_async()
        .await;
    let source = OmdbClient::new(server.url(), "test");
    let mut browser = browser();

    let request = browser.set_query("qwzx").unwrap();
    let completion = request.run(&source).await;
    browser.apply_search(completion);

    assert_eq!(browser.error(), Some(NO_RESULTS_MESSAGE));
    assert!(browser.results().is_empty());
    assert!(!browser.is_loading());
}

#[test]
fn test_escape_closes_detail_while_loading() {
    let mut browser = browser();
    browser.select_movie("tt1375666").unwrap();

    let actions = browser.key_pressed(Key::Escape);
    assert_eq!(actions, vec![Action::CloseDetail]);
    assert!(browser.selected_id().is_none());
}

#[test]
fn test_escape_closes_failed_detail() {
    let mut browser = browser();
    let request = browser.select_movie("tt0000001").unwrap();
    browser.apply_detail(crate::detail::DetailCompletion {
        generation: request.generation(),
        outcome: crate::detail::DetailOutcome::Failed("boom".to_string()),
    });

    browser.key_pressed(Key::from_code("escape"));
    assert!(browser.selected_id().is_none());
}

#[test]
fn test_escape_without_detail_does_nothing() {
    let mut browser = browser();
    assert!(browser.key_pressed(Key::Escape).is_empty());
}

#[test]
fn test_enter_focuses_and_clears_search() {
    let mut browser = browser();
    let _ = browser.set_query("Inception");
    browser.blur_search();

    let actions = browser.key_pressed(Key::Enter);
    assert_eq!(actions, vec![Action::FocusSearch]);
    assert!(browser.search_focused());
    assert_eq!(browser.query(), "");
    assert!(!browser.is_loading());
}

#[test]
fn test_enter_ignored_while_typing() {
    let mut browser = browser();
    browser.focus_search();
    let _ = browser.set_query("Incep");

    assert!(browser.key_pressed(Key::Enter).is_empty());
    assert_eq!(browser.query(), "Incep");
}

#[test]
fn test_new_query_closes_open_detail() {
    let mut browser = browser();
    browser.select_movie("tt1375666").unwrap();
    let _ = browser.set_query("Matrix");
    assert!(browser.selected_id().is_none());
    // Escape binding went away with the detail view
    assert!(browser.key_pressed(Key::Escape).is_empty());
}

#[test]
fn test_stale_search_never_reaches_view() {
    let mut browser = browser();
    let first = browser.set_query("Matrix").unwrap();
    let second = browser.set_query("Inception").unwrap();

    assert!(!browser.apply_search(SearchCompletion {
        generation: first.generation(),
        outcome: SearchOutcome::Found(vec![SearchResult {
            id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            poster_url: String::new(),
        }]),
    }));
    assert!(browser.results().is_empty());
    assert!(browser.is_loading());

    assert!(browser.apply_search(SearchCompletion {
        generation: second.generation(),
        outcome: SearchOutcome::NotFound,
    }));
    assert!(!browser.is_loading());
}

#[test]
fn test_delete_watched_and_toggles() {
    let mut browser = browser();
    assert!(!browser.delete_watched("tt404"));

    browser.toggle_results();
    browser.toggle_watched();
    assert!(!browser.results_open());
    assert!(!browser.watched_open());
    browser.toggle_watched();
    assert!(browser.watched_open());
}

#[test]
fn test_shutdown_clears_loading() {
    let mut browser = browser();
    let _request = browser.set_query("Inception").unwrap();
    browser.select_movie("tt1375666");
    browser.shutdown();
    assert!(!browser.is_loading());
    assert!(browser.selected_id().is_none());
}

#[test]
fn test_enter_on_empty_search_keeps_detail_open() {
    let mut browser = browser();
    let _request = browser.select_movie("tt1375666").unwrap();

    assert_eq!(browser.key_pressed(Key::Enter), vec![Action::FocusSearch]);
    assert_eq!(browser.selected_id(), Some("tt1375666"));
    // Escape still bound to the open detail
    assert_eq!(browser.key_pressed(Key::Escape), vec![Action::CloseDetail]);
}

#[test]
fn test_resubmitting_same_query_keeps_search_and_detail() {
    let mut browser = browser();
    let _search = browser.set_query("Inception").unwrap();
    let _detail = browser.select_movie("tt1375666").unwrap();

    assert!(browser.set_query("Inception").is_none());
    assert_eq!(browser.selected_id(), Some("tt1375666"));
    assert!(browser.is_loading());
}
