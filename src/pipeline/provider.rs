//! In-process providers.
//!
//! Real data sources live outside this crate and implement [`Provider`]
//! directly. These cover tests, demos and glue code.

use super::Provider;
use crate::context::PipelineContext;
use crate::item::Item;
use crate::operator::catalog::OperatorGroup;
use crate::operator::{Describe, Param};
use crate::stream::StreamWriter;

/// Replays a fixed list of items on every run.
pub struct FromItems {
    items: Vec<Item>,
}

impl Describe for FromItems {
    fn name(&self) -> &str {
        "from_items"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.items.len() as i64)]
    }
}

impl Provider for FromItems {
    fn provide(&self, _ctx: &PipelineContext, output: &StreamWriter) {
        for item in &self.items {
            if output.is_closed() {
                tracing::debug!("Stream closed, from_items stopping early");
                return;
            }
            output.write(item.clone());
        }
    }
}

pub fn from_items(items: impl IntoIterator<Item = Item>) -> FromItems {
    FromItems {
        items: items.into_iter().collect(),
    }
}

/// Provider backed by a closure that writes into the stream itself.
pub struct FromFn<F> {
    name: String,
    f: F,
}

impl<F> Describe for FromFn<F> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> Provider for FromFn<F>
where
    F: Fn(&PipelineContext, &StreamWriter) + Send + Sync,
{
    fn provide(&self, ctx: &PipelineContext, output: &StreamWriter) {
        (self.f)(ctx, output)
    }
}

/// The closure must poll [`StreamWriter::is_closed`] itself.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> FromFn<F>
where
    F: Fn(&PipelineContext, &StreamWriter) + Send + Sync,
{
    FromFn {
        name: name.into(),
        f,
    }
}

/// Calls `f(0)`, `f(1)`, ... until it returns `None` or the stream closes.
pub struct Generate<F> {
    name: String,
    f: F,
}

impl<F> Describe for Generate<F> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> Provider for Generate<F>
where
    F: Fn(u64) -> Option<Item> + Send + Sync,
{
    fn provide(&self, _ctx: &PipelineContext, output: &StreamWriter) {
        let mut index = 0;
        while !output.is_closed() {
            let Some(item) = (self.f)(index) else {
                return;
            };
            output.write(item);
            index += 1;
        }
        tracing::debug!(produced = index, "Stream closed, {} stopping early", self.name);
    }
}

pub fn generate<F>(name: impl Into<String>, f: F) -> Generate<F>
where
    F: Fn(u64) -> Option<Item> + Send + Sync,
{
    Generate {
        name: name.into(),
        f,
    }
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "Providers",
        module_path!(),
        "In-process sources feeding the first stream of a pipeline.",
    )
    .entry(
        "from_items(items)",
        "()",
        "Stream",
        "Replay a fixed list of items.",
    )
    .entry(
        "from_fn(name, f)",
        "()",
        "Stream",
        "Let a closure write into the stream. It must poll is_closed.",
    )
    .entry(
        "generate(name, f)",
        "()",
        "Stream",
        "Write f(0), f(1), ... until it returns None or the stream closes.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::channel;

    #[test]
    fn test_from_items_stops_when_closed() {
        let provider = from_items((0..10).map(|v| Item::new().with_field("v", v)));
        let (writer, stream) = channel(None);
        stream.close();
        provider.provide(&PipelineContext::default(), &writer);
        assert_eq!(writer.stats().accepted, 0);
        assert_eq!(writer.stats().dropped, 0);
    }

    #[test]
    fn test_generate_until_none() {
        let provider = generate("three", |i| (i < 3).then(|| Item::new().with_field("i", i as i64)));
        let (writer, mut stream) = channel(None);
        provider.provide(&PipelineContext::default(), &writer);
        writer.end();
        assert_eq!(stream.read_all().len(), 3);
        assert_eq!(provider.describe().to_string(), "three()");
    }
}
