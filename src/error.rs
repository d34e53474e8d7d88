//! Error handling for persona-streams
//!
//! Item-level failures never surface here: a leaf operator that cannot
//! produce a value returns `None`, and a stream that cannot continue simply
//! ends. This type covers the edges of the engine only (configuration files,
//! logging setup, spawning stage threads and encoding output).

use thiserror::Error;

/// Main error type for persona-streams operations
#[derive(Error, Debug)]
pub enum StreamsError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors parsing a TOML configuration file
    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A pipeline stage thread could not be started
    #[error("Failed to spawn stage '{stage}': {source}")]
    StageSpawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    /// Errors installing the tracing subscriber
    #[error("Logging error: {0}")]
    Logging(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<StreamsError>,
    },
}

impl StreamsError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        StreamsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for persona-streams operations
pub type Result<T> = std::result::Result<T, StreamsError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| StreamsError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| StreamsError::Io(e).with_context(f()))
    }
}
