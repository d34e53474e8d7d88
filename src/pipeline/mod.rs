//! Stream-based processing pipelines.
//!
//! A pipeline is one provider, zero or more transformations and one terminal
//! consumer. Every stage except the terminal runs on its own thread. Stages
//! share nothing but the [`Stream`] between them.
//!
//! # Architecture
//!
//! ```text
//! [Provider] ──stream──► [Transformation] ──stream──► ... ──stream──► [ItemsFunction]
//!  own thread              own thread                                 caller's thread
//! ```
//!
//! # Shutdown
//!
//! - **Natural**: the provider returns, the runner writes end-of-stream, and
//!   every stage downstream finishes in turn.
//! - **Early**: a stage that needs no more input (`limit`, `first`) closes
//!   its upstream stream. Producers poll [`StreamWriter::is_closed`] between
//!   writes and return. A stage whose thread exits drops its input, which
//!   closes it, so cancellation cascades back to the provider.
//!
//! The runner always closes the terminal's stream after the terminal
//! returns, then joins every stage thread.

pub mod provider;
pub mod stages;
pub mod terminal;

pub use provider::{from_fn, from_items, generate, FromFn, FromItems, Generate};
pub use stages::{filter, limit, project, set_field, sort_by, Filter, Limit, Project, SetField, SortBy};
pub use terminal::{collect, count, first, for_each, json_lines, Collect, Count, First, ForEach, JsonLines};

use crate::context::PipelineContext;
use crate::error::{Result, StreamsError};
use crate::item::{Item, Value};
use crate::operator::{Describe, Description, Function};
use crate::stream::{Stream, StreamWriter};
use std::thread::{self, JoinHandle};

/// Source stage: populates the stream the pipeline hands it.
///
/// Invoked once per run, on a dedicated thread. Implementations must check
/// [`StreamWriter::is_closed`] before each write and return once it is set.
/// The runner writes end-of-stream when `provide` returns.
pub trait Provider: Describe + Send + Sync {
    fn provide(&self, ctx: &PipelineContext, output: &StreamWriter);
}

/// Intermediate stage: reads one stream and writes another.
///
/// May drop, reorder, split or merge items. The runner writes end-of-stream
/// on `output` when `transform` returns.
pub trait Transformation: Describe + Send + Sync {
    fn transform(&self, ctx: &PipelineContext, input: &mut Stream, output: &StreamWriter);
}

/// Terminal stage: turns a stream into a result.
///
/// Runs on the caller's thread. It should either drain `input` or close it.
/// The runner closes it afterwards regardless.
pub trait ItemsFunction<T>: Describe {
    fn consume(&self, ctx: &PipelineContext, input: &mut Stream) -> T;
}

/// Pipeline builder and runner.
pub struct Pipeline {
    ctx: PipelineContext,
    provider: Box<dyn Provider>,
    transformations: Vec<Box<dyn Transformation>>,
}

impl Pipeline {
    pub fn new(ctx: PipelineContext, provider: impl Provider + 'static) -> Self {
        Self {
            ctx,
            provider: Box::new(provider),
            transformations: Vec::new(),
        }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    // ==================== Builder ====================

    /// Append a transformation stage.
    pub fn transform(mut self, transformation: impl Transformation + 'static) -> Self {
        self.transformations.push(Box::new(transformation));
        self
    }

    /// Keep items the predicate definitely matches.
    pub fn filter(self, predicate: impl Function<Item, bool> + 'static) -> Self {
        self.transform(stages::filter(predicate))
    }

    /// Add or replace a field with the function's output (`null` when it has none).
    pub fn set_field<F, O>(self, name: impl Into<String>, function: F) -> Self
    where
        F: Function<Item, O> + 'static,
        O: Into<Value> + 'static,
    {
        self.transform(stages::set_field(name, function))
    }

    /// Keep only the named fields.
    pub fn project<S: Into<String>>(self, fields: impl IntoIterator<Item = S>) -> Self {
        self.transform(stages::project(fields))
    }

    /// Pass the first `n` items, then stop the stages upstream.
    pub fn limit(self, n: usize) -> Self {
        self.transform(stages::limit(n))
    }

    /// Sort every item by a field. Materializes the whole stream.
    pub fn sort_by(self, field: impl Into<String>, descending: bool) -> Self {
        self.transform(stages::sort_by(field, descending))
    }

    // ==================== Introspection ====================

    /// Descriptions of the provider and each transformation, in order.
    pub fn stages(&self) -> Vec<Description> {
        std::iter::once(self.provider.describe())
            .chain(self.transformations.iter().map(|t| t.describe()))
            .collect()
    }

    /// `provider -> stage -> stage`
    pub fn describe(&self) -> String {
        self.stages()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Full chain including the terminal.
    pub fn describe_with<T, F>(&self, terminal: &F) -> String
    where
        F: ItemsFunction<T> + ?Sized,
    {
        format!("{} -> {}", self.describe(), terminal.describe())
    }

    // ==================== Execution ====================

    /// Run every stage and hand the last stream to `terminal`.
    ///
    /// Fails only if a stage thread cannot be spawned. Item-level failures
    /// never surface here.
    pub fn run<T, F>(self, terminal: &F) -> Result<T>
    where
        F: ItemsFunction<T> + ?Sized,
    {
        let description = self.describe_with(terminal);
        tracing::info!("Starting pipeline: {}", description);

        let Pipeline {
            ctx,
            provider,
            transformations,
        } = self;

        let mut handles = Vec::with_capacity(transformations.len() + 1);

        let (writer, mut stream) = ctx.open_stream(Some(provider.describe()));
        let stage_ctx = ctx.clone();
        handles.push(spawn_stage(provider.name().to_string(), move || {
            provider.provide(&stage_ctx, &writer);
            tracing::debug!("Provider {} finished", provider.name());
            writer.end();
        })?);

        for transformation in transformations {
            let (writer, downstream) = ctx.open_stream(Some(transformation.describe()));
            let mut upstream = stream;
            let stage_ctx = ctx.clone();
            handles.push(spawn_stage(transformation.name().to_string(), move || {
                transformation.transform(&stage_ctx, &mut upstream, &writer);
                tracing::debug!("Transformation {} finished", transformation.name());
                writer.end();
            })?);
            stream = downstream;
        }

        let result = terminal.consume(&ctx, &mut stream);
        let stats = stream.stats();
        stream.close();
        drop(stream);

        for handle in handles {
            let name = handle.thread().name().unwrap_or("stage").to_string();
            if handle.join().is_err() {
                tracing::error!("Pipeline stage '{}' panicked", name);
            }
        }

        tracing::info!(
            accepted = stats.accepted,
            dropped = stats.dropped,
            "Pipeline finished: {}",
            description
        );
        Ok(result)
    }

    /// Run with [`collect`].
    pub fn collect(self) -> Result<Vec<Item>> {
        self.run(&terminal::collect())
    }

    /// Run with [`count`].
    pub fn count(self) -> Result<u64> {
        self.run(&terminal::count())
    }

    /// Run with [`first`].
    pub fn first(self) -> Result<Option<Item>> {
        self.run(&terminal::first())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.describe())
            .finish()
    }
}

fn spawn_stage<F>(name: String, body: F) -> Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(format!("stage:{}", name))
        .spawn(body)
        .map_err(|source| StreamsError::StageSpawn { stage: name, source })
}
