//! Per-concern configuration sections
//!
//! Each section is a plain serde struct with defaults so that a partial
//! `config.toml` only needs to name the values it overrides.
//!
//! # Main Types
//!
//! - [`StreamSettings`] - Queue sizing for every stream created by a pipeline
//! - [`HashSettings`] - Default algorithm for hash operators
//! - [`TimeSettings`] - Default format for time formatting operators
//! - [`LoggingSettings`] - Tracing subscriber setup

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default stream capacity (items buffered before a writer blocks)
pub const DEFAULT_STREAM_CAPACITY: usize = 1024;

/// Default hash algorithm name
pub const DEFAULT_HASH_ALGORITHM: &str = "SHA-256";

/// Default time format (chrono strftime syntax)
pub const DEFAULT_TIME_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// Default log level directive
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ==================== Stream ====================

/// Queue settings applied to each stream of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Maximum buffered items per stream before writers block
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Ignore `capacity` and never block writers
    #[serde(default)]
    pub unbounded: bool,
}

fn default_capacity() -> usize {
    DEFAULT_STREAM_CAPACITY
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_STREAM_CAPACITY,
            unbounded: false,
        }
    }
}

impl StreamSettings {
    /// Queue bound to use for new streams, `None` for unbounded
    pub fn queue_capacity(&self) -> Option<usize> {
        if self.unbounded {
            None
        } else {
            Some(self.capacity.max(1))
        }
    }
}

// ==================== Hash ====================

/// Settings for hash operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSettings {
    /// Algorithm used when an operator is built without one
    #[serde(default = "default_hash_algorithm")]
    pub default_algorithm: String,
}

fn default_hash_algorithm() -> String {
    DEFAULT_HASH_ALGORITHM.to_string()
}

impl Default for HashSettings {
    fn default() -> Self {
        Self {
            default_algorithm: default_hash_algorithm(),
        }
    }
}

// ==================== Time ====================

/// Settings for time formatting operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSettings {
    /// Format used when an operator is built without one
    #[serde(default = "default_time_format")]
    pub default_format: String,
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            default_format: default_time_format(),
        }
    }
}

// ==================== Logging ====================

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Install a subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files (stdout only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            directory: None,
        }
    }
}
