//! Field-vs-constant comparison predicates.
//!
//! Numbers compare across ints and floats; strings and bools compare
//! naturally. Comparing incompatible kinds (a string field against a number)
//! has no value, so the item does not pass a filter.

use crate::item::Value;
use crate::operator::catalog::OperatorGroup;
use crate::operator::field::{AnyField, FieldOperation, FieldProcessor};
use crate::operator::Param;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }
}

pub struct Compare {
    op: CompareOp,
    value: Value,
}

impl FieldOperation for Compare {
    type Kind = AnyField;
    type Output = bool;

    fn name(&self) -> &str {
        self.op.name()
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::Value(self.value.clone())]
    }

    fn process(&self, field: &Value) -> Option<bool> {
        match self.op {
            CompareOp::Eq => Some(field.loose_eq(&self.value)),
            CompareOp::Ne => Some(!field.loose_eq(&self.value)),
            CompareOp::Gt => self.ordering(field).map(|o| o == Ordering::Greater),
            CompareOp::Gte => self.ordering(field).map(|o| o != Ordering::Less),
            CompareOp::Lt => self.ordering(field).map(|o| o == Ordering::Less),
            CompareOp::Lte => self.ordering(field).map(|o| o != Ordering::Greater),
        }
    }
}

impl Compare {
    fn ordering(&self, field: &Value) -> Option<Ordering> {
        let ordering = field.compare(&self.value);
        if ordering.is_none() {
            tracing::warn!(
                operator = self.op.name(),
                found = field.kind(),
                against = self.value.kind(),
                "Values are not comparable"
            );
        }
        ordering
    }
}

pub fn compare(
    field: impl Into<String>,
    op: CompareOp,
    value: impl Into<Value>,
) -> FieldProcessor<Compare> {
    FieldProcessor::new(
        field,
        Compare {
            op,
            value: value.into(),
        },
    )
}

pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> FieldProcessor<Compare> {
    compare(field, CompareOp::Eq, value)
}

pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> FieldProcessor<Compare> {
    compare(field, CompareOp::Ne, value)
}

pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> FieldProcessor<Compare> {
    compare(field, CompareOp::Gt, value)
}

pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> FieldProcessor<Compare> {
    compare(field, CompareOp::Gte, value)
}

pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> FieldProcessor<Compare> {
    compare(field, CompareOp::Lt, value)
}

pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> FieldProcessor<Compare> {
    compare(field, CompareOp::Lte, value)
}

pub(crate) fn catalog_group() -> OperatorGroup {
    let mut group = OperatorGroup::new(
        "Comparators",
        module_path!(),
        "Predicates comparing a field of an item with a constant.",
    );
    for (op, text) in [
        ("eq", "equal to"),
        ("ne", "not equal to"),
        ("gt", "greater than"),
        ("gte", "greater than or equal to"),
        ("lt", "less than"),
        ("lte", "less than or equal to"),
    ] {
        group = group.entry(
            format!("{}(field, value)", op),
            "Item",
            "bool",
            format!("Whether the field is {} the value.", text),
        );
    }
    group
}
