//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use persona_streams::{Item, PipelineContext, StreamsConfig};
use std::time::Duration;

/// Create a test timeout duration
pub fn test_timeout() -> Duration {
    Duration::from_millis(100)
}

/// Context with small streams so backpressure kicks in quickly
pub fn small_context() -> PipelineContext {
    PipelineContext::new(StreamsConfig::default().with_capacity(2))
}

/// Items `{"v": n}` for each value
pub fn numbered(values: impl IntoIterator<Item = i64>) -> Vec<Item> {
    values
        .into_iter()
        .map(|v| Item::new().with_field("v", v))
        .collect()
}
