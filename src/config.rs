//! Startup configuration.
//!
//! Read once from `config.json` in the platform config directory. Every field
//! is optional in the file; anything left out falls back to its default.
//!
//! ```json
//! {
//!   "page_size": 20,
//!   "load_more_threshold": 40
//! }
//! ```

use crate::paginated::Type as PaginationStyle;
use crate::source::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used under the platform config, data and cache directories.
pub const APP_DIR: &str = "show-explorer";

/// User settings, read from `config.json` in the config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Records per local page, and per infinite-scroll reveal.
    pub page_size: usize,
    /// Prefetch once this few local pages remain ahead of the cursor.
    pub ahead_threshold: usize,
    /// Fetch before revealing once this few fetched records remain unrevealed.
    pub load_more_threshold: usize,
    /// Root of the remote show index.
    pub base_url: String,
    /// Delay before a remembered scroll offset is applied.
    pub restore_delay_ms: u64,
    /// Overrides the default favorites file location.
    pub favorites_path: Option<PathBuf>,
    /// Pagination control in the footer: page numbers or dots.
    pub pagination: PaginationStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 12,
            ahead_threshold: 2,
            load_more_threshold: 24,
            base_url: DEFAULT_BASE_URL.to_string(),
            restore_delay_ms: 100,
            favorites_path: None,
            pagination: PaginationStyle::Arabic,
        }
    }
}

impl Config {
    /// Default location: `<config dir>/show-explorer/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Loads from the default location, or returns defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads from `path`. A missing file yields the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e.to_string())),
        };

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config.normalized())
    }

    /// `restore_delay_ms` as a duration.
    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }

    /// Where favorites are persisted, honouring `favorites_path`.
    pub fn favorites_file(&self) -> Option<PathBuf> {
        self.favorites_path
            .clone()
            .or_else(crate::favorites::JsonFileStorage::default_path)
    }

    fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self
    }
}

/// Why the config file could not be used.
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Io(String),
    /// The file is not valid JSON for [`Config`].
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
