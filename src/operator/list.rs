//! List field operators.
//!
//! Elements are compared with [`Value::loose_eq`], so `1` and `1.0` match.

use crate::item::Value;
use crate::operator::catalog::OperatorGroup;
use crate::operator::field::{FieldOperation, FieldProcessor, ListField};
use crate::operator::Param;

/// True iff the field shares at least one element with a fixed list.
pub struct Intersects {
    list: Vec<Value>,
}

impl FieldOperation for Intersects {
    type Kind = ListField;
    type Output = bool;

    fn name(&self) -> &str {
        "intersects"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::Value(Value::List(self.list.clone()))]
    }

    fn process(&self, value: &[Value]) -> Option<bool> {
        Some(
            value
                .iter()
                .any(|element| self.list.iter().any(|other| element.loose_eq(other))),
        )
    }
}

/// True iff the field contains the given element.
pub struct ListContains {
    element: Value,
}

impl FieldOperation for ListContains {
    type Kind = ListField;
    type Output = bool;

    fn name(&self) -> &str {
        "list_contains"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::Value(self.element.clone())]
    }

    fn process(&self, value: &[Value]) -> Option<bool> {
        Some(value.iter().any(|v| v.loose_eq(&self.element)))
    }
}

/// Number of elements in the field.
pub struct Size;

impl FieldOperation for Size {
    type Kind = ListField;
    type Output = i64;

    fn name(&self) -> &str {
        "size"
    }

    fn process(&self, value: &[Value]) -> Option<i64> {
        Some(value.len() as i64)
    }
}

pub fn intersects<V: Into<Value>>(
    field: impl Into<String>,
    list: impl IntoIterator<Item = V>,
) -> FieldProcessor<Intersects> {
    FieldProcessor::new(
        field,
        Intersects {
            list: list.into_iter().map(Into::into).collect(),
        },
    )
}

pub fn contains(field: impl Into<String>, element: impl Into<Value>) -> FieldProcessor<ListContains> {
    FieldProcessor::new(
        field,
        ListContains {
            element: element.into(),
        },
    )
}

pub fn size(field: impl Into<String>) -> FieldProcessor<Size> {
    FieldProcessor::new(field, Size)
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "ListOperators",
        module_path!(),
        "Operators over a list field of an item.",
    )
    .entry(
        "intersects(field, list)",
        "Item",
        "bool",
        "Whether the field shares at least one element with the list.",
    )
    .entry(
        "contains(field, element)",
        "Item",
        "bool",
        "Whether the field contains the element.",
    )
    .entry("size(field)", "Item", "i64", "Number of elements in the field.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::operator::{Describe, Function, Predicate};

    fn with_list(values: Vec<i64>) -> Item {
        Item::new().with_field("ids", values)
    }

    #[test]
    fn test_intersects() {
        assert!(!intersects("ids", [1, 2]).test(&with_list(vec![])));
        assert!(intersects("ids", [2, 3]).test(&with_list(vec![1, 2])));
        assert!(!intersects("ids", Vec::<i64>::new()).test(&with_list(vec![1, 2])));
        assert!(!intersects("ids", [3, 4]).test(&with_list(vec![1, 2])));
    }

    #[test]
    fn test_intersects_empty_is_a_value_not_absence() {
        assert_eq!(
            intersects("ids", [1]).apply(&with_list(vec![])),
            Some(false)
        );
    }

    #[test]
    fn test_intersects_wrong_kind_or_missing() {
        let op = intersects("ids", [1]);
        assert_eq!(op.apply(&Item::new().with_field("ids", "1")), None);
        assert_eq!(op.apply(&Item::new()), None);
        assert!(!op.test(&Item::new()));
    }

    #[test]
    fn test_intersects_describe() {
        let op = intersects("tags", ["work", "family"]);
        assert_eq!(op.describe().to_string(), "intersects(tags, [work, family])");
    }

    #[test]
    fn test_list_contains_and_size() {
        let item = with_list(vec![5, 6, 7]);
        assert!(contains("ids", 6).test(&item));
        assert!(contains("ids", 6.0).test(&item));
        assert!(!contains("ids", 8).test(&item));
        assert_eq!(size("ids").apply(&item), Some(3));
    }
}
