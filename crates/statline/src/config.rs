//! Host preferences loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use statline_round::{DEFAULT_CACHE_CAPACITY, RoundRules};
use tracing::{debug, info, instrument};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "STATLINE_CONFIG";

/// Preferences for a play session. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct StatlineConfig {
    /// Requested round length in seconds, clamped by the round rules.
    #[serde(default = "default_round_duration_secs")]
    round_duration_secs: u64,

    /// Milliseconds between clock ticks while a round is active.
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,

    /// Hints that may be bought per round.
    #[serde(default = "default_max_hints")]
    max_hints: u32,

    /// Points lost per hint.
    #[serde(default = "default_penalty")]
    hint_penalty: u32,

    /// Points lost on timeout or running out of guesses.
    #[serde(default = "default_penalty")]
    miss_penalty: u32,

    /// Capacity of the match verdict cache.
    #[serde(default = "default_cache_capacity")]
    cache_capacity: usize,

    /// Number of recent targets the picker avoids.
    #[serde(default = "default_recent_window")]
    recent_window: usize,
}

fn default_round_duration_secs() -> u64 {
    60
}

fn default_tick_interval_ms() -> u64 {
    250
}

fn default_max_hints() -> u32 {
    3
}

fn default_penalty() -> u32 {
    1
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_recent_window() -> usize {
    5
}

impl Default for StatlineConfig {
    fn default() -> Self {
        Self {
            round_duration_secs: default_round_duration_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            max_hints: default_max_hints(),
            hint_penalty: default_penalty(),
            miss_penalty: default_penalty(),
            cache_capacity: default_cache_capacity(),
            recent_window: default_recent_window(),
        }
    }
}

impl StatlineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        info!(
            round_duration_secs = config.round_duration_secs,
            max_hints = config.max_hints,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Resolves configuration from `--config`, then [`CONFIG_ENV`], then
    /// defaults.
    #[instrument]
    pub fn resolve(flag: Option<&Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(flag, std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    /// Same as [`StatlineConfig::resolve`] with the environment value
    /// supplied by the caller.
    #[instrument]
    pub fn resolve_with(flag: Option<&Path>, env_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = flag {
            return Self::from_file(path);
        }
        match env_path.filter(|path| !path.as_os_str().is_empty()) {
            Some(path) => {
                debug!(path = %path.display(), "Using config from environment");
                Self::from_file(path)
            }
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Round rules with this config's hint and penalty settings applied.
    pub fn round_rules(&self) -> RoundRules {
        RoundRules::new()
            .with_max_hints(self.max_hints)
            .with_hint_penalty(self.hint_penalty)
            .with_miss_penalty(self.miss_penalty)
    }

    /// Requested round length.
    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.round_duration_secs)
    }

    /// Interval between ticks, never shorter than one millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
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
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
