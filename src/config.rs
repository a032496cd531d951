// Engine configuration - RON file with defaults for every field

use crate::persistence::DEFAULT_CATALOGUE_KEY;
use crate::sequencer::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "drum_sequencer";
const CONFIG_FILE: &str = "config.ron";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tempo on startup, steps per minute
    pub default_tempo: f64,
    /// Scheduling horizon in milliseconds
    pub lookahead_ms: f64,
    /// Maximum time between scheduler polls in milliseconds
    pub poll_interval_ms: u64,
    /// Pattern selected on startup
    pub default_pattern: String,
    /// Key the catalogue is persisted under
    pub catalogue_key: String,
    /// Directory of the file-backed key-value store (platform data dir if unset)
    pub store_dir: Option<PathBuf>,
    /// Capacity of the scheduler → UI notification ringbuffer
    pub notification_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_tempo: 120.0,
            lookahead_ms: 100.0,
            poll_interval_ms: 25,
            default_pattern: "basichouse".to_string(),
            catalogue_key: DEFAULT_CATALOGUE_KEY.to_string(),
            store_dir: None,
            notification_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Platform config file location, e.g. ~/.config/drum_sequencer/config.ron
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from a RON file; a missing file yields the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(text) => ron::from_str::<Self>(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from the platform default location (defaults if there is none)
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.validate()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.default_tempo.is_finite() && self.default_tempo > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "default_tempo must be > 0 (got {})",
                self.default_tempo
            )));
        }

        if !(self.lookahead_ms.is_finite() && self.lookahead_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "lookahead_ms must be > 0 (got {})",
                self.lookahead_ms
            )));
        }

        if self.poll_interval_ms == 0 || self.poll_interval_ms as f64 >= self.lookahead_ms {
            return Err(ConfigError::Invalid(format!(
                "poll_interval_ms must be > 0 and below lookahead_ms ({} vs {})",
                self.poll_interval_ms, self.lookahead_ms
            )));
        }

        if self.catalogue_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "catalogue_key cannot be empty".to_string(),
            ));
        }

        if self.notification_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notification_capacity must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            lookahead: self.lookahead_ms / 1000.0,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// Store directory, falling back to the platform data directory
    pub fn resolved_store_dir(&self) -> Option<PathBuf> {
        self.store_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
    }
}
