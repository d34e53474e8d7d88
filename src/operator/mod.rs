//! Operator framework: introspectable functions and predicates.
//!
//! Every operator reports its name and the ordered parameters it was built
//! with ([`Describe`]) and maps an input to an optional output
//! ([`Function`]). A `None` output is the "no value" outcome: a leaf that
//! could not produce a result (missing field, unsupported algorithm...)
//! logs a warning and returns `None` instead of failing the stream.
//! Predicates are functions returning `bool`; [`Predicate::test`] treats
//! "no value" as "does not pass".
//!
//! # Introspection
//!
//! Parameters are either plain values or nested operator descriptions, so a
//! composed operator describes itself recursively:
//!
//! ```text
//! and(intersects(tags, [work, family]), not(eq(starred, true)))
//! ```
//!
//! Descriptions are a read-only projection used for listings and docs.
//! They are never used to rebuild or execute an operator.

pub mod catalog;
pub mod compare;
pub mod field;
pub mod list;
pub mod logic;
pub mod string;
pub mod time;

pub use catalog::{OperatorCatalog, OperatorEntry, OperatorGroup};
pub use field::{FieldKind, FieldOperation, FieldProcessor, FieldSource};

use crate::item::Value;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One constructor parameter of an operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    Value(Value),
    Operator(Description),
}

impl Param {
    pub fn value(v: impl Into<Value>) -> Self {
        Param::Value(v.into())
    }

    pub fn operator<D: Describe + ?Sized>(op: &D) -> Self {
        Param::Operator(op.describe())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(v) => write!(f, "{}", v),
            Param::Operator(d) => write!(f, "{}", d),
        }
    }
}

/// Stable description of an operator: `name(param, param, ...)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Description {
    pub name: String,
    pub parameters: Vec<Param>,
}

impl Description {
    pub fn new(name: impl Into<String>, parameters: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ")")
    }
}

/// Name and constructor parameters of an operator or stage.
pub trait Describe {
    fn name(&self) -> &str;

    /// Constructor arguments, in order.
    fn parameters(&self) -> Vec<Param> {
        Vec::new()
    }

    fn describe(&self) -> Description {
        Description::new(self.name(), self.parameters())
    }
}

/// A unit of computation from `I` to an optional `O`.
///
/// Implementations hold no per-invocation state: the same parameters and
/// the same input always give the same output.
pub trait Function<I: ?Sized, O>: Describe + Send + Sync {
    fn apply(&self, input: &I) -> Option<O>;
}

/// Boolean functions used to filter items.
pub trait Predicate<I: ?Sized>: Function<I, bool> {
    /// `true` only for a definite match. "No value" does not pass.
    fn test(&self, input: &I) -> bool {
        self.apply(input).unwrap_or(false)
    }
}

impl<I: ?Sized, P: Function<I, bool> + ?Sized> Predicate<I> for P {}

pub type BoxedFunction<I, O> = Box<dyn Function<I, O>>;
pub type BoxedPredicate<I> = Box<dyn Function<I, bool>>;

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn parameters(&self) -> Vec<Param> {
        (**self).parameters()
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn parameters(&self) -> Vec<Param> {
        (**self).parameters()
    }
}

impl<I: ?Sized, O, F: Function<I, O> + ?Sized> Function<I, O> for Box<F> {
    fn apply(&self, input: &I) -> Option<O> {
        (**self).apply(input)
    }
}

impl<I: ?Sized, O, F: Function<I, O> + ?Sized> Function<I, O> for Arc<F> {
    fn apply(&self, input: &I) -> Option<O> {
        (**self).apply(input)
    }
}

/// Operator backed by a closure, for one-off pipeline logic.
pub struct FnOperator<F> {
    name: String,
    f: F,
}

impl<F> Describe for FnOperator<F> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<I: ?Sized, O, F> Function<I, O> for FnOperator<F>
where
    F: Fn(&I) -> Option<O> + Send + Sync,
{
    fn apply(&self, input: &I) -> Option<O> {
        (self.f)(input)
    }
}

/// Wrap a closure as a named operator.
pub fn from_fn<I: ?Sized, O, F>(name: impl Into<String>, f: F) -> FnOperator<F>
where
    F: Fn(&I) -> Option<O> + Send + Sync,
{
    FnOperator {
        name: name.into(),
        f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    #[test]
    fn test_description_display() {
        let inner = Description::new("eq", vec![Param::value("starred"), Param::value(true)]);
        let outer = Description::new(
            "not",
            vec![Param::Operator(inner)],
        );
        assert_eq!(outer.to_string(), "not(eq(starred, true))");
    }

    #[test]
    fn test_description_json() {
        let desc = Description::new("hash", vec![Param::value("name"), Param::value("MD5")]);
        assert_eq!(
            serde_json::to_value(&desc).unwrap(),
            serde_json::json!({ "name": "hash", "parameters": ["name", "MD5"] })
        );
    }

    #[test]
    fn test_from_fn_predicate() {
        let positive = from_fn("positive", |item: &Item| {
            item.get("v").and_then(|v| v.as_f64()).map(|v| v > 0.0)
        });

        assert!(positive.test(&Item::new().with_field("v", 3)));
        assert!(!positive.test(&Item::new().with_field("v", -3)));
        // No value does not pass.
        assert!(!positive.test(&Item::new()));
        assert_eq!(positive.describe().to_string(), "positive()");
    }

    #[test]
    fn test_boxed_operator_describes_inner() {
        let boxed: BoxedPredicate<Item> =
            Box::new(from_fn("always", |_: &Item| Some(true)));
        assert_eq!(boxed.name(), "always");
        assert!(boxed.test(&Item::new()));
    }
}
