//! Configuration module for persona-streams
//!
//! All tunables live in a [`StreamsConfig`] value that is handed to a
//! pipeline through its [`PipelineContext`](crate::context::PipelineContext).
//! Nothing here is global: two pipelines in the same process can run with
//! different stream capacities or hash defaults.
//!
//! # Config Location
//!
//! `load_or_default()` reads `config.toml` from the platform-appropriate data
//! directory under `dev.persona-streams`:
//!
//! - **Linux**: `~/.local/share/dev.persona-streams/`
//! - **macOS**: `~/Library/Application Support/dev.persona-streams/`
//! - **Windows**: `%APPDATA%\dev.persona-streams\`
//!
//! # Example
//!
//! ```ignore
//! use persona_streams::config::StreamsConfig;
//!
//! let mut config = StreamsConfig::load_or_default();
//! config.stream.capacity = 64;
//! config.save("streams.toml")?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{Result, StreamsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.persona-streams";

/// Config filename inside the app data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StreamsConfig {
    /// Stream queue settings
    #[serde(default)]
    pub stream: StreamSettings,

    /// Hash operator settings
    #[serde(default)]
    pub hash: HashSettings,

    /// Time formatting settings
    #[serde(default)]
    pub time: TimeSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl StreamsConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StreamsError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Load the config from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StreamsError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| StreamsError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            StreamsError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Builder-style override of the stream capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.stream.capacity = capacity;
        self.stream.unbounded = false;
        self
    }

    /// Builder-style switch to unbounded streams
    pub fn unbounded(mut self) -> Self {
        self.stream.unbounded = true;
        self
    }
}
