//! Built-in transformations.
//!
//! Every stage checks whether its output was closed before writing and
//! returns when it was. Returning drops the input stream, which closes it in
//! turn, so early termination propagates to the provider.

use super::Transformation;
use crate::context::PipelineContext;
use crate::item::{Item, Value};
use crate::operator::catalog::OperatorGroup;
use crate::operator::{BoxedPredicate, Describe, Function, Param, Predicate};
use crate::stream::{Stream, StreamWriter};
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Read `input` to the end, writing whatever `f` returns.
fn map_items(input: &mut Stream, output: &StreamWriter, mut f: impl FnMut(Item) -> Option<Item>) {
    while let Some(item) = input.read() {
        if output.is_closed() {
            tracing::trace!("Downstream closed, stopping stage");
            return;
        }
        if let Some(item) = f(item) {
            output.write(item);
        }
    }
}

// ==================== Filter ====================

pub struct Filter {
    predicate: BoxedPredicate<Item>,
}

impl Describe for Filter {
    fn name(&self) -> &str {
        "filter"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::operator(&self.predicate)]
    }
}

impl Transformation for Filter {
    fn transform(&self, _ctx: &PipelineContext, input: &mut Stream, output: &StreamWriter) {
        map_items(input, output, |item| self.predicate.test(&item).then_some(item));
    }
}

/// Keep the items `predicate` matches. "No value" drops the item.
pub fn filter(predicate: impl Function<Item, bool> + 'static) -> Filter {
    Filter {
        predicate: Box::new(predicate),
    }
}

// ==================== SetField ====================

pub struct SetField<F, O> {
    name: String,
    function: F,
    _output: PhantomData<fn() -> O>,
}

impl<F: Function<Item, O>, O> Describe for SetField<F, O> {
    fn name(&self) -> &str {
        "set_field"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.name.as_str()), Param::operator(&self.function)]
    }
}

impl<F, O> Transformation for SetField<F, O>
where
    F: Function<Item, O>,
    O: Into<Value>,
{
    fn transform(&self, _ctx: &PipelineContext, input: &mut Stream, output: &StreamWriter) {
        map_items(input, output, |item| {
            let value = self.function.apply(&item).map(Into::into).unwrap_or_default();
            Some(item.with_field(self.name.as_str(), value))
        });
    }
}

/// Add or replace `name` with the function's output, `null` when it has none.
pub fn set_field<F, O>(name: impl Into<String>, function: F) -> SetField<F, O>
where
    F: Function<Item, O>,
    O: Into<Value>,
{
    SetField {
        name: name.into(),
        function,
        _output: PhantomData,
    }
}

// ==================== Project ====================

pub struct Project {
    fields: Vec<String>,
}

impl Describe for Project {
    fn name(&self) -> &str {
        "project"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.fields.clone())]
    }
}

impl Transformation for Project {
    fn transform(&self, _ctx: &PipelineContext, input: &mut Stream, output: &StreamWriter) {
        map_items(input, output, |item| Some(item.project(&self.fields)));
    }
}

pub fn project<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Project {
    Project {
        fields: fields.into_iter().map(Into::into).collect(),
    }
}

// ==================== Limit ====================

pub struct Limit {
    n: usize,
}

impl Describe for Limit {
    fn name(&self) -> &str {
        "limit"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.n as i64)]
    }
}

impl Transformation for Limit {
    fn transform(&self, _ctx: &PipelineContext, input: &mut Stream, output: &StreamWriter) {
        if self.n == 0 {
            input.close();
            return;
        }

        let mut passed = 0;
        while let Some(item) = input.read() {
            if output.is_closed() {
                return;
            }
            output.write(item);
            passed += 1;
            if passed == self.n {
                tracing::debug!(limit = self.n, "Limit reached, closing upstream");
                input.close();
                return;
            }
        }
    }
}

pub fn limit(n: usize) -> Limit {
    Limit { n }
}

// ==================== SortBy ====================

pub struct SortBy {
    field: String,
    descending: bool,
}

impl SortBy {
    /// Total order over optional values: missing, null, bools, numbers,
    /// strings, then lists and maps (unordered among themselves).
    fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        fn rank(value: Option<&Value>) -> u8 {
            match value {
                None => 0,
                Some(Value::Null) => 1,
                Some(Value::Bool(_)) => 2,
                Some(Value::Int(_)) | Some(Value::Float(_)) => 3,
                Some(Value::Str(_)) => 4,
                Some(Value::List(_)) => 5,
                Some(Value::Map(_)) => 6,
            }
        }

        match (a, b) {
            (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
            (Some(Value::Str(x)), Some(Value::Str(y))) => x.cmp(y),
            (Some(Value::Int(x)), Some(Value::Int(y))) => x.cmp(y),
            (Some(x), Some(y)) if rank(a) == 3 && rank(b) == 3 => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
            _ => rank(a).cmp(&rank(b)),
        }
    }
}

impl Describe for SortBy {
    fn name(&self) -> &str {
        "sort_by"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.field.as_str()), Param::value(self.descending)]
    }
}

impl Transformation for SortBy {
    fn transform(&self, _ctx: &PipelineContext, input: &mut Stream, output: &StreamWriter) {
        let mut items = input.read_all();
        items.sort_by(|a, b| {
            let ordering = Self::compare(a.get(&self.field), b.get(&self.field));
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        for item in items {
            if output.is_closed() {
                return;
            }
            output.write(item);
        }
    }
}

/// Sort by a field. Stable: equal keys keep their arrival order.
pub fn sort_by(field: impl Into<String>, descending: bool) -> SortBy {
    SortBy {
        field: field.into(),
        descending,
    }
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "Transformations",
        module_path!(),
        "Pipeline stages reading one stream and writing another.",
    )
    .entry(
        "filter(predicate)",
        "Stream",
        "Stream",
        "Keep the items the predicate matches. No value drops the item.",
    )
    .entry(
        "set_field(name, function)",
        "Stream",
        "Stream",
        "Add or replace a field with the function's output, null when it has none.",
    )
    .entry("project(fields)", "Stream", "Stream", "Keep only the named fields.")
    .entry(
        "limit(n)",
        "Stream",
        "Stream",
        "Pass the first n items, then close the upstream stream.",
    )
    .entry(
        "sort_by(field, descending)",
        "Stream",
        "Stream",
        "Sort all items by a field. Missing fields sort first.",
    )
}
