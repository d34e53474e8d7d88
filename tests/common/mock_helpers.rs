//! Mock construction helpers

use mockall::mock;
use persona_streams::{Describe, Item, PipelineContext, Provider, StreamWriter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mock! {
    pub Source {}

    impl Provider for Source {
        fn provide(&self, ctx: &PipelineContext, output: &StreamWriter);
    }
}

impl Describe for MockSource {
    fn name(&self) -> &str {
        "mock_source"
    }
}

/// Mocked provider expected to run exactly once, writing `items` until the
/// stream closes. `saw_close` is set if it stopped early.
pub fn create_mock_source(items: Vec<Item>, saw_close: Arc<AtomicBool>) -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_provide()
        .times(1)
        .returning(move |_ctx, output| {
            for item in &items {
                if output.is_closed() {
                    saw_close.store(true, Ordering::SeqCst);
                    return;
                }
                output.write(item.clone());
            }
        });
    source
}
