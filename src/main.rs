//! persona-streams - Main Entry Point
//!
//! Reads JSON objects (one per line) from stdin, runs them through a
//! pipeline built from the command line and writes the result to stdout as
//! JSON lines.
//!
//! ```text
//! cat calls.jsonl | persona-streams --hash caller --require-tag work --limit 10
//! ```

use anyhow::Context;
use clap::Parser;
use persona_streams::{
    logging,
    operator::{list::intersects, string::hash, OperatorCatalog},
    pipeline::{json_lines, Pipeline},
    Describe, Item, PipelineContext, Provider, StreamWriter, StreamsConfig,
};
use std::io::{self, BufRead, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "persona-streams")]
#[command(version, about = "Filter, hash and reshape JSON-lines records", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform data directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Add `<FIELD>_hash` with the digest of FIELD (repeatable)
    #[arg(long = "hash", value_name = "FIELD")]
    hash: Vec<String>,

    /// Hash algorithm (defaults to `hash.default_algorithm`)
    #[arg(long)]
    algorithm: Option<String>,

    /// Keep records whose `tags` list contains any of these tags
    #[arg(long = "require-tag", value_name = "TAG")]
    require_tag: Vec<String>,

    /// Keep only these fields in the output
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Stop after N records
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the pipeline description instead of running it
    #[arg(long)]
    describe: bool,

    /// Print the operator catalog as markdown and exit
    #[arg(long)]
    catalog: bool,
}

/// One item per JSON line on stdin. Lines that are not JSON objects are skipped.
struct StdinLines;

impl Describe for StdinLines {
    fn name(&self) -> &str {
        "stdin_lines"
    }
}

impl Provider for StdinLines {
    fn provide(&self, _ctx: &PipelineContext, output: &StreamWriter) {
        for (number, line) in io::stdin().lock().lines().enumerate() {
            if output.is_closed() {
                return;
            }
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {}", e);
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match Item::parse_json(&line) {
                Ok(item) => output.write(item),
                Err(e) => tracing::warn!("Skipping line {}: {}", number + 1, e),
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StreamsConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => StreamsConfig::load_or_default(),
    };

    let _guard = logging::init(&config.logging).context("Failed to initialise logging")?;

    if cli.catalog {
        println!("{}", OperatorCatalog::builtin().to_markdown());
        return Ok(());
    }

    let algorithm = cli
        .algorithm
        .clone()
        .unwrap_or_else(|| config.hash.default_algorithm.clone());

    let mut pipeline = Pipeline::new(PipelineContext::new(config), StdinLines);
    if !cli.require_tag.is_empty() {
        pipeline = pipeline.filter(intersects("tags", cli.require_tag.clone()));
    }
    for field in &cli.hash {
        pipeline = pipeline.set_field(format!("{}_hash", field), hash(field.as_str(), algorithm.as_str()));
    }
    if !cli.fields.is_empty() {
        pipeline = pipeline.project(cli.fields.clone());
    }
    if let Some(n) = cli.limit {
        pipeline = pipeline.limit(n);
    }

    let sink = json_lines(BufWriter::new(io::stdout().lock()));

    if cli.describe {
        println!("{}", pipeline.describe_with(&sink));
        return Ok(());
    }

    let written = pipeline.run(&sink)?.context("Failed to write output")?;
    tracing::info!("Wrote {} records", written);
    Ok(())
}
