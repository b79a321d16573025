use super::screen::{summary_line, watched_table};
use super::{load_config, open_watchlist};
use crate::output::Output;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_config::PathManager;

pub fn run_list(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = load_config(&path_manager)?;
    let watchlist = open_watchlist(&path_manager, &config)?;
    let summary = watchlist.summary();

    if !output.is_human() {
        output.json(&json!({
            "summary": summary,
            "watched": watchlist.entries(),
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("{}", "Movies you watched".bold());
    println!("{}", summary_line(&summary));
    if watchlist.is_empty() {
        output.info("Nothing here yet. Run 'watchlist-plus' to search and rate movies.");
    } else {
        println!("{}", watched_table(watchlist.entries()));
    }
    Ok(())
}

pub fn run_remove(id: &str, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config = load_config(&path_manager)?;
    let mut watchlist = open_watchlist(&path_manager, &config)?;

    let title = watchlist.get(id).map(|entry| entry.title.clone());
    if !watchlist.delete(id) {
        return Err(color_eyre::eyre::eyre!("{} is not on the watched list", id));
    }

    match title {
        Some(title) => output.success(format!("Removed {} ({})", title, id)),
        None => output.success(format!("Removed {}", id)),
    }
    Ok(())
}
