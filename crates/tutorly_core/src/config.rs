//! Core runtime configuration.
//!
//! Loading order, later steps win:
//! 1. compiled defaults (`CoreConfig::default()`)
//! 2. keys present in the JSON preferences file, if it exists
//! 3. `TUTORLY_*` environment variables
//!
//! # Invariants
//! - A missing preferences file is not an error.
//! - Blank environment values are ignored.

use crate::logging::{default_log_level, normalize_level};
use crate::logic::history::DEFAULT_UNDO_LIMIT;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATA_FILE: &str = "TUTORLY_DATA_FILE";
pub const ENV_LOG_LEVEL: &str = "TUTORLY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TUTORLY_LOG_DIR";

const DEFAULT_DATA_FILE: &str = "data/addressbook.json";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Loaded values are syntactically valid but unusable.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config io error: {err}"),
            Self::Json(err) => write!(f, "config json error: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    /// Address book JSON file.
    pub data_file: PathBuf,
    pub log_level: String,
    /// Rolling log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Maximum number of undoable commands kept.
    pub undo_limit: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}

impl CoreConfig {
    /// Loads preferences from `path` and the process environment.
    ///
    /// # Errors
    /// - `Io` / `Json` when an existing file cannot be read or parsed.
    /// - `Invalid` when the merged result fails `validate`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads the preferences file; keys absent from it keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!(
                "event=config_load module=config status=default path={}",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        debug!(
            "event=config_load module=config status=ok path={}",
            path.display()
        );
        Ok(config)
    }

    /// Applies `TUTORLY_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(ENV_DATA_FILE) {
            self.data_file = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
    }

    /// # Errors
    /// - `Invalid` for an empty data path, an unknown log level or a zero
    ///   undo limit.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("dataFile cannot be empty".to_string()));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        if self.undo_limit == 0 {
            return Err(ConfigError::Invalid(
                "undoLimit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
