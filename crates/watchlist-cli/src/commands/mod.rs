pub mod browse;
pub mod clear;
pub mod config;
pub mod input;
pub mod prompts;
pub mod screen;
pub mod watched;

use crate::output::Output;
use color_eyre::Result;
use std::io::IsTerminal;
use watchlist_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use watchlist_core::{FileStore, Watchlist};

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

pub fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

pub fn open_watchlist(path_manager: &PathManager, config: &Config) -> Result<Watchlist<FileStore>> {
    let store_file = config
        .storage
        .watched_file
        .clone()
        .unwrap_or_else(|| path_manager.store_file());

    let store = FileStore::open(&store_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open store at {}: {}", store_file.display(), e))?;
    Ok(Watchlist::hydrate(store))
}

/// API key from env or credentials file; asks once and saves it when running interactively.
pub fn resolve_api_key(path_manager: &PathManager, output: &Output) -> Result<String> {
    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    if let Some(key) = cred_store.resolve_omdb_api_key() {
        return Ok(key);
    }

    if !is_interactive() {
        return Err(color_eyre::eyre::eyre!(
            "No OMDb API key configured. Run 'watchlist-plus config api-key' or set {}",
            API_KEY_ENV
        ));
    }

    output.info("An OMDb API key is needed to search movies (free at https://www.omdbapi.com/apikey.aspx).");
    let key = prompts::prompt_secret("OMDb API key")?;
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(color_eyre::eyre::eyre!("No OMDb API key entered"));
    }

    cred_store.set_omdb_api_key(key.clone());
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;
    output.success(format!("Saved API key to {}", credentials_file.display()));
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path().to_path_buf());

        let config = load_config(&paths).unwrap();
        assert_eq!(config.omdb.api_url, watchlist_config::DEFAULT_API_URL);
    }

    #[test]
    fn test_load_config_rejects_bad_url() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "[omdb]\napi_url = \"ftp://example.com\"\n").unwrap();

        assert!(load_config(&paths).is_err());
    }

    #[test]
    fn test_open_watchlist_uses_configured_file() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::with_base(dir.path().to_path_buf());
        let custom = dir.path().join("elsewhere.json");
        // Each store value is itself a JSON document
        let watched = r#"[{"imdbID":"tt0133093","title":"The Matrix","year":"1999","poster":"","imdbRating":8.7,"userRating":9,"runtime":136,"countRatingDecisions":1}]"#;
        std::fs::write(&custom, serde_json::json!({ "watched": watched }).to_string()).unwrap();

        let mut config = Config::default();
        config.storage.watched_file = Some(custom);

        let watchlist = open_watchlist(&paths, &config).unwrap();
        assert_eq!(watchlist.len(), 1);
        assert!(watchlist.contains("tt0133093"));
    }
}
