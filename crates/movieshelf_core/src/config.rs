//! Runtime configuration for processes embedding the core.
//!
//! Values come from `MOVIESHELF_*` environment variables, falling back to
//! defaults that suit a local run.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::path::PathBuf;

const ENV_DB_PATH: &str = "MOVIESHELF_DB_PATH";
const ENV_LOG_LEVEL: &str = "MOVIESHELF_LOG_LEVEL";
const ENV_LOG_DIR: &str = "MOVIESHELF_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "movieshelf.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file shared by all repositories.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. `None` leaves file logging disabled.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Builds a config from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = non_empty(lookup(ENV_DB_PATH)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty(lookup(ENV_LOG_LEVEL)) {
            config.log_level = level;
        }
        config.log_dir = non_empty(lookup(ENV_LOG_DIR)).map(PathBuf::from);
        config
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
