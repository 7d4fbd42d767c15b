//! Application configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use xogame_core::{MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Settings for the game binary.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the SQLite history database.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Pause before each replayed move, in milliseconds.
    #[serde(default = "default_replay_interval_ms")]
    replay_interval_ms: u64,

    /// Grid size of the game created at startup.
    #[serde(default = "default_grid_size")]
    initial_grid_size: usize,
}

#[instrument]
fn default_db_path() -> String {
    "xogame.db".to_string()
}

#[instrument]
fn default_replay_interval_ms() -> u64 {
    1000
}

#[instrument]
fn default_grid_size() -> usize {
    MIN_GRID_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            replay_interval_ms: default_replay_interval_ms(),
            initial_grid_size: default_grid_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if
    /// it names an unsupported grid size.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;

        info!(db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed TOML or an unsupported grid size.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validated()
    }

    /// Applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the overridden grid size is unsupported.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        db_path: Option<String>,
        replay_interval_ms: Option<u64>,
        initial_grid_size: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        if let Some(ms) = replay_interval_ms {
            self.replay_interval_ms = ms;
        }
        if let Some(size) = initial_grid_size {
            self.initial_grid_size = size;
        }
        self.validated()
    }

    /// Pause before each replayed move.
    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.initial_grid_size) {
            return Err(ConfigError::new(format!(
                "initial_grid_size must be between {} and {}, got {}",
                MIN_GRID_SIZE, MAX_GRID_SIZE, self.initial_grid_size
            )));
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
