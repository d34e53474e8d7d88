//! Execution context shared by every stage of a pipeline run.
//!
//! The context owns the configuration a run executes with and opens the
//! streams connecting its stages. It is cheap to clone: each stage thread
//! receives its own handle.

use crate::config::StreamsConfig;
use crate::operator::Description;
use crate::stream::{self, Stream, StreamWriter};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    config: Arc<StreamsConfig>,
}

impl PipelineContext {
    pub fn new(config: StreamsConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &StreamsConfig {
        &self.config
    }

    /// Open a stream sized by `stream.capacity`, remembering its producer.
    pub fn open_stream(&self, provider: Option<Description>) -> (StreamWriter, Stream) {
        stream::channel_with_provider(self.config.stream.queue_capacity(), provider)
    }
}

impl From<StreamsConfig> for PipelineContext {
    fn from(config: StreamsConfig) -> Self {
        Self::new(config)
    }
}
