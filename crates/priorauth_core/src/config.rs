//! Store composition settings.
//!
//! # Responsibility
//! - Describe which record backend to use and where it keeps its data.
//! - Validate settings before any storage is touched.
//!
//! # Invariants
//! - `data_dir` is absolute.
//! - File name and records key are non-empty.

use crate::logging::default_log_level;
use crate::repo::kv_repo::DEFAULT_RECORDS_KEY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_FILE_NAME: &str = "legacy_emr.sqlite3";
const DEFAULT_DATA_DIR_NAME: &str = "priorauth";

/// Record backend selected at composition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Transactional backend on an SQLite file.
    #[default]
    Sqlite,
    /// Simple backend on JSON files in `data_dir`.
    KeyValue,
    /// Simple backend kept in process memory.
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::KeyValue => "key_value",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    RelativeDataDir(PathBuf),
    EmptyField(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::RelativeDataDir(path) => write!(
                f,
                "data_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::EmptyField(name) => write!(f, "{name} cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Settings for [`crate::open_record_store`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub records_key: String,
    /// `None` falls back to [`default_log_level`].
    pub log_level: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            records_key: DEFAULT_RECORDS_KEY.to_string(),
            log_level: None,
        }
    }
}

impl StoreConfig {
    /// Default settings for `backend` rooted at `data_dir`.
    pub fn new(backend: StoreBackend, data_dir: impl AsRef<Path>) -> Self {
        Self {
            backend,
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parses a JSON config document; missing keys take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(self.data_dir.clone()));
        }
        if self.db_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyField("db_file_name"));
        }
        if self.records_key.trim().is_empty() {
            return Err(ConfigError::EmptyField("records_key"));
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Log files live next to the record data.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
