//! Predicate combinators.
//!
//! `and` / `or` treat a child's "no value" as `false`. `not` keeps absence
//! absent, so an item missing a field matches neither `p` nor `not(p)`.

use crate::operator::catalog::OperatorGroup;
use crate::operator::{BoxedPredicate, Describe, Function, Param, Predicate};

pub struct And<I: ?Sized> {
    left: BoxedPredicate<I>,
    right: BoxedPredicate<I>,
}

pub struct Or<I: ?Sized> {
    left: BoxedPredicate<I>,
    right: BoxedPredicate<I>,
}

pub struct Not<I: ?Sized> {
    inner: BoxedPredicate<I>,
}

impl<I: ?Sized> Describe for And<I> {
    fn name(&self) -> &str {
        "and"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::operator(&self.left), Param::operator(&self.right)]
    }
}

impl<I: ?Sized> Function<I, bool> for And<I> {
    fn apply(&self, input: &I) -> Option<bool> {
        Some(self.left.test(input) && self.right.test(input))
    }
}

impl<I: ?Sized> Describe for Or<I> {
    fn name(&self) -> &str {
        "or"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::operator(&self.left), Param::operator(&self.right)]
    }
}

impl<I: ?Sized> Function<I, bool> for Or<I> {
    fn apply(&self, input: &I) -> Option<bool> {
        Some(self.left.test(input) || self.right.test(input))
    }
}

impl<I: ?Sized> Describe for Not<I> {
    fn name(&self) -> &str {
        "not"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::operator(&self.inner)]
    }
}

impl<I: ?Sized> Function<I, bool> for Not<I> {
    fn apply(&self, input: &I) -> Option<bool> {
        self.inner.apply(input).map(|b| !b)
    }
}

pub fn and<I, L, R>(left: L, right: R) -> And<I>
where
    I: ?Sized,
    L: Function<I, bool> + 'static,
    R: Function<I, bool> + 'static,
{
    And {
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn or<I, L, R>(left: L, right: R) -> Or<I>
where
    I: ?Sized,
    L: Function<I, bool> + 'static,
    R: Function<I, bool> + 'static,
{
    Or {
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn not<I, P>(inner: P) -> Not<I>
where
    I: ?Sized,
    P: Function<I, bool> + 'static,
{
    Not {
        inner: Box::new(inner),
    }
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "BooleanOperators",
        module_path!(),
        "Combinators building compound predicates.",
    )
    .entry(
        "and(left, right)",
        "Item",
        "bool",
        "Both predicates match. No value counts as no match.",
    )
    .entry(
        "or(left, right)",
        "Item",
        "bool",
        "Either predicate matches. No value counts as no match.",
    )
    .entry(
        "not(predicate)",
        "Item",
        "bool",
        "Negates a predicate. No value stays no value.",
    )
}
