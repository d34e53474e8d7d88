//! Built-in terminal consumers.

use super::ItemsFunction;
use crate::context::PipelineContext;
use crate::error::{Result, ResultExt};
use crate::item::Item;
use crate::operator::catalog::OperatorGroup;
use crate::operator::Describe;
use crate::stream::Stream;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Materialize every item in arrival order.
pub struct Collect;

impl Describe for Collect {
    fn name(&self) -> &str {
        "collect"
    }
}

impl ItemsFunction<Vec<Item>> for Collect {
    fn consume(&self, _ctx: &PipelineContext, input: &mut Stream) -> Vec<Item> {
        input.read_all()
    }
}

pub fn collect() -> Collect {
    Collect
}

pub struct Count;

impl Describe for Count {
    fn name(&self) -> &str {
        "count"
    }
}

impl ItemsFunction<u64> for Count {
    fn consume(&self, _ctx: &PipelineContext, input: &mut Stream) -> u64 {
        input.iter().count() as u64
    }
}

pub fn count() -> Count {
    Count
}

/// Take one item and cancel the rest of the stream.
pub struct First;

impl Describe for First {
    fn name(&self) -> &str {
        "first"
    }
}

impl ItemsFunction<Option<Item>> for First {
    fn consume(&self, _ctx: &PipelineContext, input: &mut Stream) -> Option<Item> {
        let item = input.read();
        input.close();
        item
    }
}

pub fn first() -> First {
    First
}

pub struct ForEach<F> {
    f: F,
}

impl<F> Describe for ForEach<F> {
    fn name(&self) -> &str {
        "for_each"
    }
}

impl<F: Fn(&Item)> ItemsFunction<()> for ForEach<F> {
    fn consume(&self, _ctx: &PipelineContext, input: &mut Stream) {
        for item in input.iter() {
            (self.f)(&item);
        }
    }
}

/// Run a side effect on every item.
pub fn for_each<F: Fn(&Item)>(f: F) -> ForEach<F> {
    ForEach { f }
}

/// Write each item as one line of JSON.
///
/// Stops and closes the stream on the first write error.
pub struct JsonLines<W> {
    writer: Mutex<W>,
}

impl<W> JsonLines<W> {
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> Describe for JsonLines<W> {
    fn name(&self) -> &str {
        "json_lines"
    }
}

impl<W: Write> ItemsFunction<Result<u64>> for JsonLines<W> {
    fn consume(&self, _ctx: &PipelineContext, input: &mut Stream) -> Result<u64> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut written = 0;

        while let Some(item) = input.read() {
            let line = match item.to_json_string() {
                Ok(line) => line,
                Err(e) => {
                    input.close();
                    return Err(e);
                }
            };
            if let Err(e) = writeln!(writer, "{}", line).context("Failed to write JSON line") {
                input.close();
                return Err(e);
            }
            written += 1;
        }

        writer.flush().context("Failed to flush JSON lines")?;
        Ok(written)
    }
}

pub fn json_lines<W: Write>(writer: W) -> JsonLines<W> {
    JsonLines {
        writer: Mutex::new(writer),
    }
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "TerminalOperators",
        module_path!(),
        "Consumers turning the last stream of a pipeline into a result.",
    )
    .entry("collect()", "Stream", "Vec<Item>", "All items in arrival order.")
    .entry("count()", "Stream", "u64", "Number of items.")
    .entry(
        "first()",
        "Stream",
        "Option<Item>",
        "The first item. Closes the stream after reading it.",
    )
    .entry("for_each(f)", "Stream", "()", "Run a side effect on every item.")
    .entry(
        "json_lines(writer)",
        "Stream",
        "Result<u64>",
        "Write each item as one JSON object per line.",
    )
}
