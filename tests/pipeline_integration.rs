//! End-to-end pipeline scenarios

mod common;

use common::builders::ItemBuilder;
use common::mock_helpers::{create_mock_source, MockSource};
use common::{numbered, small_context};
use persona_streams::operator::compare::{gt, gte};
use persona_streams::operator::list::intersects;
use persona_streams::operator::logic::{and, not};
use persona_streams::operator::string::{hash, hash_default};
use persona_streams::operator::time::format_default;
use persona_streams::operator::{self, OperatorCatalog};
use persona_streams::pipeline::{collect, from_fn, from_items, json_lines, Pipeline};
use persona_streams::{Item, PipelineContext, StreamWriter, StreamsConfig, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[test]
fn test_filter_passes_matching_items() {
    let result = Pipeline::new(small_context(), from_items(numbered([1, 2, 3])))
        .filter(gt("v", 1))
        .collect()
        .unwrap();

    assert_eq!(result, numbered([2, 3]));
}

#[test]
fn test_limit_stops_provider_early() {
    let saw_close = Arc::new(AtomicBool::new(false));
    let source = create_mock_source(numbered(0..100), saw_close.clone());

    let result = Pipeline::new(small_context(), source)
        .limit(1)
        .collect()
        .unwrap();

    assert_eq!(result, numbered([0]));
    assert!(saw_close.load(Ordering::SeqCst));
}

#[test]
fn test_mock_provider_runs_once_per_execution() {
    let mut source = MockSource::new();
    source.expect_provide().times(1).returning(|_ctx, output| {
        output.write(Item::new().with_field("v", 1));
    });

    let count = Pipeline::new(PipelineContext::default(), source).count().unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_first_on_endless_provider_terminates() {
    let produced = Arc::new(AtomicU64::new(0));
    let counter = produced.clone();
    let provider = from_fn("endless", move |_: &PipelineContext, output: &StreamWriter| {
        let mut i = 0i64;
        while !output.is_closed() {
            output.write(Item::new().with_field("v", i));
            counter.fetch_add(1, Ordering::SeqCst);
            i += 1;
        }
    });

    let first = Pipeline::new(small_context(), provider).first().unwrap();
    assert_eq!(first, Some(Item::new().with_field("v", 0)));
    assert!(produced.load(Ordering::SeqCst) >= 1);
}

#[test]
fn test_call_log_enrichment() {
    let items = vec![
        ItemBuilder::new("alice").duration(30).tag("work").field("starred", false).build(),
        ItemBuilder::new("bob").duration(120).tag("work").field("starred", false).build(),
        ItemBuilder::new("carol").duration(300).tag("family").field("starred", false).build(),
        ItemBuilder::new("dave").duration(400).tag("work").field("starred", true).build(),
        // No "starred" field: eq() has no value, and neither does not(eq()).
        ItemBuilder::new("erin").duration(500).tag("work").build(),
    ];

    let config = StreamsConfig::default();
    let hash_caller = hash_default(&config.hash, "caller");
    let when = format_default(&config.time, "time_created");

    let result = Pipeline::new(PipelineContext::new(config), from_items(items))
        .filter(and(
            and(gte("duration", 60), intersects("tags", ["work"])),
            not(operator::compare::eq("starred", true)),
        ))
        .set_field("caller", hash_caller)
        .set_field("when", when)
        .project(["caller", "when"])
        .collect()
        .unwrap();

    assert_eq!(result.len(), 1);
    let caller = result[0].get("caller").and_then(|v| v.as_str()).unwrap();
    assert_eq!(caller.len(), 64);
    assert!(caller.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(
        result[0].get("when").and_then(|v| v.as_str()),
        Some("20170101_000000_000")
    );
    assert_eq!(result[0].keys().collect::<Vec<_>>(), vec!["caller", "when"]);
}

#[test]
fn test_hash_and_format_fields() {
    let items = vec![ItemBuilder::new("abc").time_created(1_483_228_800_123).build()];
    let config = StreamsConfig::default();
    let when = format_default(&config.time, "time_created");

    let result = Pipeline::new(PipelineContext::new(config), from_items(items))
        .set_field("caller", hash("caller", "sha1"))
        .set_field("when", when)
        .project(["caller", "when"])
        .collect()
        .unwrap();

    assert_eq!(
        result,
        vec![Item::new()
            .with_field("caller", "a9993e364706816aba3e25717850c26c9cd0d89d")
            .with_field("when", "20170101_000000_123")]
    );
}

#[test]
fn test_unsupported_algorithm_yields_null() {
    let result = Pipeline::new(small_context(), from_items(vec![ItemBuilder::new("abc").build()]))
        .set_field("caller", hash("caller", "CRC32"))
        .collect()
        .unwrap();

    assert_eq!(result[0].get("caller"), Some(&Value::Null));
}

#[test]
fn test_sort_then_limit() {
    let result = Pipeline::new(small_context(), from_items(numbered([5, 3, 9, 1])))
        .sort_by("v", true)
        .limit(2)
        .collect()
        .unwrap();

    assert_eq!(result, numbered([9, 5]));
}

#[test]
fn test_json_lines_terminal() {
    let sink = json_lines(Vec::new());
    let written = Pipeline::new(small_context(), from_items(numbered([1, 2])))
        .run(&sink)
        .unwrap()
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        String::from_utf8(sink.into_inner()).unwrap(),
        "{\"v\":1}\n{\"v\":2}\n"
    );
}

#[test]
fn test_pipeline_description() {
    let pipeline = Pipeline::new(small_context(), from_items(numbered([1, 2, 3])))
        .filter(gt("v", 1))
        .limit(2);

    assert_eq!(
        pipeline.describe_with(&collect()),
        "from_items(3) -> filter(gt(v, 1)) -> limit(2) -> collect()"
    );
}

#[test]
fn test_independent_configs_in_parallel() {
    let run = |algorithm: &str| {
        let mut config = StreamsConfig::default();
        config.hash.default_algorithm = algorithm.to_string();
        let op = hash_default(&config.hash, "caller");
        Pipeline::new(PipelineContext::new(config), from_items(vec![ItemBuilder::new("abc").build()]))
            .set_field("caller", op)
            .project(["caller"])
            .first()
            .unwrap()
            .and_then(|item| item.get("caller").and_then(|v| v.as_str().map(str::to_string)))
    };

    let md5 = thread::spawn(move || run("MD5"));
    let sha = thread::spawn(move || run("SHA-1"));

    assert_eq!(
        md5.join().unwrap().as_deref(),
        Some("900150983cd24fb0d6963f7d28e17f72")
    );
    assert_eq!(
        sha.join().unwrap().as_deref(),
        Some("a9993e364706816aba3e25717850c26c9cd0d89d")
    );
}

#[test]
fn test_terminal_closing_early_does_not_leak_blocked_stages() {
    let start = Instant::now();
    let result = Pipeline::new(small_context(), from_items(numbered(0..1000)))
        .filter(gt("v", -1))
        .first()
        .unwrap();

    assert_eq!(result, Some(Item::new().with_field("v", 0)));
    assert!(start.elapsed() < common::test_timeout() * 50);
}

#[test]
fn test_catalog_lists_every_group() {
    let catalog = OperatorCatalog::builtin();
    let names: Vec<&str> = catalog.groups().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "StringOperators",
            "ListOperators",
            "Comparators",
            "BooleanOperators",
            "TimeOperators",
            "Providers",
            "Transformations",
            "TerminalOperators",
        ]
    );

    let markdown = catalog.to_markdown();
    assert!(markdown.contains("|----|----|"));
    assert!(markdown.contains("Module: `persona_streams::pipeline::stages`"));
}
