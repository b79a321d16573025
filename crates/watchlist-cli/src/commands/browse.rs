use super::input::{self, Input, Target};
use super::screen::Screen;
use super::{is_interactive, load_config, open_watchlist, resolve_api_key};
use crate::output::Output;
use color_eyre::Result;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use watchlist_config::PathManager;
use watchlist_core::{
    Action, Browser, CommitError, DetailCompletion, DetailRequest, KeyValueStore, SearchCompletion, SearchRequest,
};
use watchlist_models::UserRating;
use watchlist_sources::{MovieSource, OmdbClient};

enum Completion {
    Search(SearchCompletion),
    Detail(DetailCompletion),
}

enum Flow {
    Continue,
    Quit,
}

/// Runs fetches off the input loop and hands their results back to it.
struct Fetcher {
    source: Arc<dyn MovieSource>,
    tx: mpsc::UnboundedSender<Completion>,
}

impl Fetcher {
    fn search(&self, request: SearchRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = request.run(source.as_ref()).await;
            let _ = tx.send(Completion::Search(completion));
        });
    }

    fn detail(&self, request: DetailRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = request.run(source.as_ref()).await;
            let _ = tx.send(Completion::Detail(completion));
        });
    }
}

pub async fn run_browse(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;

    let config = load_config(&path_manager)?;
    let api_key = resolve_api_key(&path_manager, output)?;
    let watchlist = open_watchlist(&path_manager, &config)?;

    let source: Arc<dyn MovieSource> = Arc::new(OmdbClient::new(config.omdb.api_url.clone(), api_key));
    info!(
        source = source.source_name(),
        api_url = %config.omdb.api_url,
        watched = watchlist.len(),
        "Starting browser"
    );

    let (tx, mut completions) = mpsc::unbounded_channel();
    let fetcher = Fetcher { source, tx };
    let mut lines = spawn_stdin_reader();

    let mut browser = Browser::new(watchlist);
    let mut screen = Screen::new(output, is_interactive());
    screen.notice("Type a movie title to search, :help for commands.");
    screen.render(&browser);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("Input closed");
                    break;
                };
                if let Flow::Quit = handle_input(&mut browser, input::parse(&line), &fetcher, &mut screen) {
                    break;
                }
            }
            Some(completion) = completions.recv() => {
                let applied = match completion {
                    Completion::Search(c) => browser.apply_search(c),
                    Completion::Detail(c) => browser.apply_detail(c),
                };
                if applied {
                    screen.render(&browser);
                }
            }
        }
    }

    browser.shutdown();
    info!("Browser closed");
    Ok(())
}

/// Blocking stdin lives on its own thread; lines are forwarded to the async loop.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Stopped reading input");
                    break;
                }
            }
        }
    });
    rx
}

fn handle_input<S: KeyValueStore>(
    browser: &mut Browser<S>,
    input: Input,
    fetcher: &Fetcher,
    screen: &mut Screen<'_>,
) -> Flow {
    match input {
        Input::Quit => return Flow::Quit,
        Input::Help => {
            screen.help(input::HELP);
            return Flow::Continue;
        }
        Input::Invalid(msg) => {
            screen.warn(msg);
            return Flow::Continue;
        }
        Input::Key(key) => {
            let actions = browser.key_pressed(key);
            if actions.contains(&Action::FocusSearch) {
                screen.notice("Search cleared, type a title.");
            }
            if actions.is_empty() {
                return Flow::Continue;
            }
        }
        Input::Query(query) => {
            // A submitted line ends the typing
            browser.focus_search();
            let request = browser.set_query(query);
            browser.blur_search();
            if let Some(request) = request {
                fetcher.search(request);
            }
        }
        Input::Open(target) => {
            let ids = browser.results().iter().map(|r| r.id.as_str());
            let Some(id) = target.resolve(ids) else {
                screen.warn(format!("No result {}", describe(&target)));
                return Flow::Continue;
            };
            if let Some(request) = browser.select_movie(&id) {
                fetcher.detail(request);
            }
        }
        Input::Rate(value) => {
            if let Some(previous) = browser.rated_before() {
                screen.warn(format!("You already rated this movie {}", previous));
                return Flow::Continue;
            }
            let rating = match UserRating::new(value) {
                Ok(rating) => rating,
                Err(e) => {
                    screen.warn(e.to_string());
                    return Flow::Continue;
                }
            };
            if !browser.rate(rating) {
                screen.warn("Open a movie first (:open N)");
                return Flow::Continue;
            }
        }
        Input::Add => match browser.add_watched() {
            Ok(entry) => screen.notice(format!("Added {} to your watched list", entry.title)),
            Err(CommitError::NoRating) => {
                screen.warn("Rate the movie first (:rate 1-10)");
                return Flow::Continue;
            }
            Err(e) => {
                screen.warn(e.to_string());
                return Flow::Continue;
            }
        },
        Input::Remove(target) => {
            let ids = browser.watched().iter().map(|e| e.id.as_str());
            let Some(id) = target.resolve(ids) else {
                screen.warn(format!("No watched movie {}", describe(&target)));
                return Flow::Continue;
            };
            if !browser.delete_watched(&id) {
                screen.warn(format!("{} is not on your watched list", id));
                return Flow::Continue;
            }
        }
        Input::ToggleResults => browser.toggle_results(),
        Input::ToggleWatched => browser.toggle_watched(),
    }

    screen.render(browser);
    Flow::Continue
}

fn describe(target: &Target) -> String {
    match target {
        Target::Index(n) => format!("#{}", n),
        Target::Id(id) => id.clone(),
    }
}
