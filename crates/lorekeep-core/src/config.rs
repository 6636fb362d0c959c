//! Persisted config (corpus path) in the app data directory, with an
//! environment override for deployments.
//!
//! Corpus path resolution order: `LORE_CORPUS_PATH` env var, then the
//! config file, then `<app-data>/lore.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_data;

const CONFIG_FILENAME: &str = "config.toml";
const CORPUS_FILENAME: &str = "lore.json";

/// Env var overriding the corpus file path.
pub const CORPUS_PATH_ENV: &str = "LORE_CORPUS_PATH";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to the embedded lore corpus JSON (written by `lorekeep embed`).
    pub corpus_path: Option<String>,
}

/// Load config from the app data directory. Returns default config if missing or invalid.
pub fn load_config() -> Config {
    let Some(data_dir) = app_data::app_data_dir() else {
        return Config::default();
    };
    let path = data_dir.join(CONFIG_FILENAME);
    let Ok(s) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    toml::from_str(&s).unwrap_or_default()
}

/// Save config to the app data directory.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let data_dir = app_data::app_data_dir().ok_or(ConfigError::NoDataDir)?;
    let path = data_dir.join(CONFIG_FILENAME);
    let s = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(&path, s).map_err(ConfigError::Write)
}

/// Resolve the corpus file path: env override, then config file, then the
/// default inside the app data directory. Falls back to `./lore.json` only
/// when no app data directory can be determined.
pub fn corpus_path() -> PathBuf {
    if let Ok(p) = std::env::var(CORPUS_PATH_ENV) {
        if !p.is_empty() {
            return PathBuf::from(p);
        }
    }
    if let Some(p) = load_config().corpus_path.filter(|s| !s.is_empty()) {
        return PathBuf::from(p);
    }
    match app_data::app_data_dir() {
        Some(dir) => dir.join(CORPUS_FILENAME),
        None => PathBuf::from(CORPUS_FILENAME),
    }
}

/// Set and persist the corpus path.
pub fn set_corpus_path(path: &Path) -> Result<(), ConfigError> {
    let mut config = load_config();
    config.corpus_path = Some(path.to_string_lossy().into_owned());
    save_config(&config)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine app data directory")]
    NoDataDir,
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(std::io::Error),
}
