use crate::output::Output;
use comfy_table::{Cell, CellAlignment, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::json;
use std::time::Duration;
use watchlist_core::{Browser, DetailState, KeyValueStore, ReadyDetail};
use watchlist_models::{SearchResult, UserRating, WatchedEntry, WatchedSummary};

const MAX_STARS: u8 = 10;

/// Draws the browser state after every change.
///
/// Human output redraws the panels in place of a real widget tree; JSON
/// output emits one snapshot object per change.
pub struct Screen<'a> {
    output: &'a Output,
    spinner: Option<ProgressBar>,
    interactive: bool,
}

impl<'a> Screen<'a> {
    pub fn new(output: &'a Output, interactive: bool) -> Self {
        Self {
            output,
            spinner: None,
            interactive,
        }
    }

    pub fn render<S: KeyValueStore>(&mut self, browser: &Browser<S>) {
        self.stop_spinner();

        if !self.output.is_human() {
            self.output.json(&snapshot(browser));
            return;
        }
        if self.output.is_quiet() {
            return;
        }

        println!();
        println!("{}", format!("── {} ──", browser.window_title()).bright_cyan().bold());
        println!();
        self.render_search(browser);
        println!();
        render_detail(browser, self.interactive);
        render_watched(browser);
        println!();

        if browser.is_loading() {
            self.start_spinner(format!("Searching for \"{}\"...", browser.query()));
        } else if matches!(browser.detail(), DetailState::Loading { .. }) {
            self.start_spinner("Loading movie details...".to_string());
        }
    }

    pub fn help(&mut self, text: &str) {
        self.stop_spinner();
        self.output.info(text);
    }

    pub fn notice(&mut self, msg: impl AsRef<str>) {
        self.stop_spinner();
        self.output.info(msg);
    }

    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.stop_spinner();
        self.output.warn(msg);
    }

    fn render_search<S: KeyValueStore>(&self, browser: &Browser<S>) {
        let query = browser.query();
        if query.is_empty() {
            println!("{} {}", "Search:".bold(), "type a title to search".dimmed());
        } else {
            println!("{} {}", "Search:".bold(), query);
        }

        if let Some(error) = browser.error() {
            println!("{}", error.red());
            return;
        }
        if browser.is_loading() {
            if !self.interactive {
                println!("{}", "Loading...".dimmed());
            }
            return;
        }
        if query.is_empty() {
            return;
        }

        println!("Found {} results", browser.num_results().bold());
        if !browser.results_open() {
            println!("{}", "[+] results hidden (:results to show)".dimmed());
            return;
        }
        if browser.num_results() > 0 {
            println!("{}", results_table(browser.results(), browser.selected_id()));
        }
    }

    fn start_spinner(&mut self, msg: String) {
        if !self.interactive {
            tracing::info!(operation = "progress", message = %msg, "Progress update");
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
        {
            spinner.set_style(style);
        }
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Drop for Screen<'_> {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

fn render_detail<S: KeyValueStore>(browser: &Browser<S>, interactive: bool) {
    match browser.detail() {
        DetailState::Idle => {}
        DetailState::Loading { id } => {
            if !interactive {
                println!("{}", format!("Loading {}...", id).dimmed());
                println!();
            }
        }
        DetailState::Failed { id, message } => {
            println!("{} {}", format!("Could not load {}:", id).red(), message);
            println!("{}", "Esc or :esc to go back".dimmed());
            println!();
        }
        DetailState::Ready(ready) => {
            println!("{}", detail_table(ready));
            match browser.rated_before() {
                Some(rating) => println!("You already rated this movie {}", rating_bar(rating).yellow()),
                None => match ready.user_rating {
                    Some(rating) => {
                        println!("Your rating: {}", rating_bar(rating).yellow());
                        println!("{}", "Type :add to add it to your watched list".dimmed());
                    }
                    None => println!("{}", "Rate it with :rate 1-10".dimmed()),
                },
            }
            println!("{}", "Esc or :esc to go back".dimmed());
            println!();
        }
    }
}

fn render_watched<S: KeyValueStore>(browser: &Browser<S>) {
    let summary = browser.summary();
    println!("{}", "Movies you watched".bold());
    println!("{}", summary_line(&summary));

    if !browser.watched_open() {
        println!("{}", "[+] list hidden (:watched to show)".dimmed());
        return;
    }
    if !browser.watched().is_empty() {
        println!("{}", watched_table(browser.watched()));
    }
}

pub fn summary_line(summary: &WatchedSummary) -> String {
    format!(
        "#️⃣ {} movies  ⭐️ {:.2}  🌟 {:.2}  ⏳ {:.0} min",
        summary.count, summary.avg_imdb_rating, summary.avg_user_rating, summary.avg_runtime_minutes
    )
}

pub fn rating_bar(rating: UserRating) -> String {
    let filled = rating.get().min(MAX_STARS) as usize;
    format!(
        "{}{} {}/{}",
        "★".repeat(filled),
        "☆".repeat(MAX_STARS as usize - filled),
        rating.get(),
        MAX_STARS
    )
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn results_table(results: &[SearchResult], selected: Option<&str>) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for (i, result) in results.iter().enumerate() {
        let marker = if selected == Some(result.id.as_str()) { "▶" } else { "" };
        table.add_row(vec![
            Cell::new(format!("{}{}", marker, i + 1)).set_alignment(CellAlignment::Right),
            Cell::new(&result.title),
            Cell::new(&result.year),
        ]);
    }
    table
}

fn detail_table(ready: &ReadyDetail) -> Table {
    let detail = &ready.detail;
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new(&detail.title).add_attribute(comfy_table::Attribute::Bold),
        Cell::new(&detail.year),
    ]);

    let imdb = detail
        .imdb_rating
        .map(|r| format!("⭐️ {:.1} IMDb rating", r))
        .unwrap_or_else(|| "⭐️ N/A".to_string());

    for (label, value) in [
        ("Released", detail.release_date.as_str()),
        ("Runtime", detail.runtime_text.as_str()),
        ("Genre", detail.genre.as_str()),
        ("IMDb", imdb.as_str()),
        ("Plot", detail.plot.as_str()),
        ("Starring", detail.actors.as_str()),
        ("Directed by", detail.director.as_str()),
        ("Poster", detail.poster_url.as_str()),
    ] {
        if !value.is_empty() {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
    }
    table
}

pub fn watched_table(entries: &[WatchedEntry]) -> Table {
    let mut table = styled_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("IMDb").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Yours").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Runtime").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(&entry.title),
            Cell::new(entry.imdb_rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "N/A".to_string())),
            Cell::new(entry.user_rating),
            Cell::new(entry.runtime),
            Cell::new(&entry.id),
        ]);
    }
    table
}

pub fn snapshot<S: KeyValueStore>(browser: &Browser<S>) -> serde_json::Value {
    let detail = match browser.detail() {
        DetailState::Idle => serde_json::Value::Null,
        DetailState::Loading { id } => json!({ "status": "loading", "imdbID": id }),
        DetailState::Failed { id, message } => json!({ "status": "failed", "imdbID": id, "error": message }),
        DetailState::Ready(ready) => json!({
            "status": "ready",
            "movie": ready.detail,
            "userRating": ready.user_rating,
            "ratedBefore": browser.rated_before(),
        }),
    };

    json!({
        "type": "screen",
        "title": browser.window_title(),
        "query": browser.query(),
        "loading": browser.is_loading(),
        "error": browser.error(),
        "results": browser.results(),
        "detail": detail,
        "watched": browser.watched(),
        "summary": browser.summary(),
    })
}
