mod schema;

pub use schema::{default_queries, Config, DEFAULT_API_URL};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::github::client::MAX_PER_PAGE;

/// Get the config directory path (~/.config/gh-menu/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("gh-menu")
}

/// Get the default config file path (~/.config/gh-menu/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// With no explicit path, a missing default file just means "use defaults".
/// An explicit path that does not exist is an error.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config = parse_config_file(&config_path)?;
    validate(&config)?;
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", path.display()))?;

    Ok(config)
}

/// Reject values the poll loop cannot work with.
pub fn validate(config: &Config) -> Result<()> {
    if config.poll_interval.is_zero() {
        anyhow::bail!("poll_interval must be greater than zero");
    }
    if config.request_timeout.is_zero() {
        anyhow::bail!("request_timeout must be greater than zero");
    }
    if config.queries.iter().all(|q| q.trim().is_empty()) {
        anyhow::bail!("at least one non-empty search query is required");
    }
    if config.per_page == 0 || config.per_page > MAX_PER_PAGE {
        anyhow::bail!("per_page must be between 1 and {}", MAX_PER_PAGE);
    }
    if config.max_concurrent_lookups == 0 {
        anyhow::bail!("max_concurrent_lookups must be at least 1");
    }
    Ok(())
}
