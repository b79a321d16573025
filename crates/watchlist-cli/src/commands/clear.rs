use super::{is_interactive, load_config, open_watchlist, prompts};
use crate::output::Output;
use color_eyre::Result;
use std::fs;
use watchlist_config::PathManager;

pub fn run_clear(all: bool, watched: bool, credentials: bool, yes: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let watched = watched || all;
    let credentials = credentials || all;

    if !watched && !credentials {
        output.warn("No clear option specified. Use --watched, --credentials, or --all");
        output.info("\nExample: watchlist-plus clear --watched");
        return Ok(());
    }

    if !yes && is_interactive() {
        let what = match (watched, credentials) {
            (true, true) => "the watched list and stored credentials",
            (true, false) => "the watched list",
            _ => "stored credentials",
        };
        if !prompts::prompt_yes_no(&format!("Really clear {}?", what), false)? {
            output.info("Nothing cleared");
            return Ok(());
        }
    }

    if watched {
        clear_watched(&path_manager, output)?;
    }
    if credentials {
        clear_credentials(&path_manager, output)?;
    }
    if all {
        output.success("Watched list and credentials cleared");
    }
    Ok(())
}

fn clear_watched(path_manager: &PathManager, output: &Output) -> Result<()> {
    let config = load_config(path_manager)?;
    let mut watchlist = open_watchlist(path_manager, &config)?;

    if watchlist.is_empty() {
        output.info("Watched list is already empty");
        return Ok(());
    }

    let count = watchlist.len();
    watchlist.clear();
    output.success(format!("Removed {} movies from the watched list", count));
    Ok(())
}

fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();
    if credentials_file.exists() {
        fs::remove_file(&credentials_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to remove credentials at {}: {}", credentials_file.display(), e))?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }
    Ok(())
}
