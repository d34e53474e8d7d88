//! # persona-streams: stream processing over personal-data records
//!
//! Providers emit [`Item`]s (ordered field-to-value records) into bounded
//! [`Stream`]s. Transformations filter, enrich and reshape them on their own
//! threads, and a terminal consumer turns the last stream into a result.
//!
//! ## Architecture
//!
//! - **Stream**: crossbeam-backed FIFO with an explicit end-of-stream
//!   terminator and a cooperative "closed" flag for early termination
//! - **Operators**: introspectable functions and predicates. Field-scoped
//!   operators extract one named field and run a leaf operation on it
//! - **Pipeline**: provider, transformations and terminal, one thread per stage
//! - **Configuration**: an explicit [`StreamsConfig`] carried by a
//!   [`PipelineContext`], no process-wide state
//!
//! ## Example
//!
//! ```ignore
//! use persona_streams::{
//!     operator::{compare::gt, list::intersects, logic::and, string::hash},
//!     pipeline::{from_items, Pipeline},
//!     PipelineContext, StreamsConfig,
//! };
//!
//! let ctx = PipelineContext::new(StreamsConfig::load_or_default());
//! let items = Pipeline::new(ctx, from_items(records))
//!     .filter(and(gt("duration", 60), intersects("tags", ["work"])))
//!     .set_field("caller_hash", hash("caller", "SHA-256"))
//!     .project(["caller_hash", "duration"])
//!     .collect()?;
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod item;
pub mod logging;
pub mod operator;
pub mod pipeline;
pub mod stream;

pub use config::StreamsConfig;
pub use context::PipelineContext;
pub use error::{Result, ResultExt, StreamsError};
pub use item::{Item, Value};
pub use operator::{Describe, Description, Function, Param, Predicate};
pub use pipeline::{ItemsFunction, Pipeline, Provider, Transformation};
pub use stream::{Stream, StreamStats, StreamWriter};
