use super::{is_interactive, load_config, prompts};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_config::{Config, CredentialStore, PathManager, API_KEY_ENV};

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::ApiKey { api_key } => configure_api_key(api_key, output),
        crate::ConfigCommands::ApiUrl { url } => configure_api_url(url, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let config = load_config(&path_manager)?;

    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    let from_env = std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false);
    let api_key = cred_store.resolve_omdb_api_key().unwrap_or_default();
    let api_key_display = if full { api_key.clone() } else { mask_string(&api_key) };
    let api_key_source = if from_env { API_KEY_ENV } else { "credentials file" };

    let store_file = config
        .storage
        .watched_file
        .clone()
        .unwrap_or_else(|| path_manager.store_file());

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "omdb": {
                "api_url": config.omdb.api_url,
                "api_key": api_key_display,
                "api_key_source": if api_key.is_empty() { serde_json::Value::Null } else { json!(api_key_source) },
            },
            "storage": {
                "watched_file": store_file.display().to_string(),
            },
            "log_file": path_manager.browse_log_file().display().to_string(),
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}\n", "Configuration".bright_cyan().bold());

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    let config_file_value = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("{} (not created yet, using defaults)", config_file.display())
    };
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file_value)]);
    table.add_row(vec![Cell::new("OMDb API URL"), Cell::new(&config.omdb.api_url)]);
    let key_value = if api_key.is_empty() {
        api_key_display
    } else {
        format!("{} (from {})", api_key_display, api_key_source)
    };
    table.add_row(vec![Cell::new("OMDb API Key"), Cell::new(key_value)]);
    table.add_row(vec![Cell::new("Watched List"), Cell::new(store_file.display().to_string())]);
    table.add_row(vec![
        Cell::new("Browser Log"),
        Cell::new(path_manager.browse_log_file().display().to_string()),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    println!("{}", table);
    println!();

    if api_key.is_empty() {
        output.warn("No OMDb API key set. Run 'watchlist-plus config api-key'");
    }
    Ok(())
}

fn configure_api_key(api_key: Option<String>, output: &Output) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => {
            if !is_interactive() {
                return Err(color_eyre::eyre::eyre!("No API key given. Pass --api-key when not running in a terminal"));
            }
            output.info("Get a free OMDb API key at https://www.omdbapi.com/apikey.aspx");
            prompts::prompt_secret("OMDb API key")?
        }
    };
    let api_key = api_key.trim().to_string();
    validate_api_key(&api_key).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create config directory: {}", e))?;

    let credentials_file = path_manager.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    cred_store.set_omdb_api_key(api_key);
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success(format!("OMDb API key saved to {}", credentials_file.display()));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the stored key", API_KEY_ENV));
    }
    Ok(())
}

fn configure_api_url(url: String, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    config.omdb.api_url = url.trim().to_string();
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("OMDb API URL set to {}", config.omdb.api_url));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// OMDb keys are short alphanumeric tokens
fn validate_api_key(input: &str) -> Result<(), &'static str> {
    if input.is_empty() {
        return Err("API key cannot be empty");
    }
    if !input.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("API key should only contain letters and digits");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string("abc"), "***");
        assert_eq!(mask_string("a1b2c3d4"), "a1***d4");
        // Keys from the environment are not validated
        assert_eq!(mask_string("aébc"), "****");
        assert_eq!(mask_string("éa1b2cü"), "éa***cü");
    }

    #[test]
    fn test_validate_api_key() {
        assert!(validate_api_key("a1b2c3d4").is_ok());
        assert!(validate_api_key("").is_err());
        assert!(validate_api_key("abc def").is_err());
    }
}
