//! Field-scoped processors.
//!
//! A [`FieldProcessor`] binds a leaf [`FieldOperation`] to one named field.
//! Applying it to an item (or any other [`FieldSource`]) first pulls the
//! field out and checks it has the shape the leaf expects ([`FieldKind`]),
//! then hands the extracted value to the leaf. A missing field or a value
//! of the wrong kind is logged and yields `None`.
//!
//! The processor's own parameters are the field name followed by the leaf's
//! parameters, so `hash(name, SHA-256)` describes a hash of field `name`.

use crate::item::{Item, Value};
use crate::operator::{Describe, Function, Param};
use indexmap::IndexMap;

/// A container that can be looked up by field name.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&Value>;
}

impl FieldSource for Item {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldSource for IndexMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FieldSource for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(name))
    }
}

/// The value shape a leaf operation works on.
pub trait FieldKind {
    type Target: ?Sized;

    /// Name used in log messages.
    const KIND: &'static str;

    fn extract(value: &Value) -> Option<&Self::Target>;
}

/// String-typed fields.
pub struct StringField;

impl FieldKind for StringField {
    type Target = str;
    const KIND: &'static str = "string";

    fn extract(value: &Value) -> Option<&str> {
        value.as_str()
    }
}

/// List-typed fields.
pub struct ListField;

impl FieldKind for ListField {
    type Target = [Value];
    const KIND: &'static str = "list";

    fn extract(value: &Value) -> Option<&[Value]> {
        value.as_list()
    }
}

/// Fields of any kind, `null` included.
pub struct AnyField;

impl FieldKind for AnyField {
    type Target = Value;
    const KIND: &'static str = "value";

    fn extract(value: &Value) -> Option<&Value> {
        Some(value)
    }
}

/// Leaf transformation over an extracted field value.
pub trait FieldOperation: Send + Sync {
    type Kind: FieldKind;
    type Output;

    fn name(&self) -> &str;

    /// Leaf parameters, appended after the field name.
    fn parameters(&self) -> Vec<Param> {
        Vec::new()
    }

    fn process(&self, value: &<Self::Kind as FieldKind>::Target) -> Option<Self::Output>;
}

/// An operator bound to one named field.
pub struct FieldProcessor<Op> {
    field: String,
    op: Op,
}

impl<Op: FieldOperation> FieldProcessor<Op> {
    pub fn new(field: impl Into<String>, op: Op) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operation(&self) -> &Op {
        &self.op
    }

    /// Extract the bound field from `source` and run the leaf on it.
    pub fn process_source<S: FieldSource + ?Sized>(&self, source: &S) -> Option<Op::Output> {
        let Some(value) = source.field(&self.field) else {
            tracing::warn!(
                operator = self.op.name(),
                field = %self.field,
                "Field not found"
            );
            return None;
        };

        let Some(target) = <Op::Kind as FieldKind>::extract(value) else {
            let expected = <Op::Kind as FieldKind>::KIND;
            tracing::warn!(
                operator = self.op.name(),
                field = %self.field,
                expected,
                found = value.kind(),
                "Field has the wrong kind"
            );
            return None;
        };

        self.op.process(target)
    }
}

impl<Op: FieldOperation> Describe for FieldProcessor<Op> {
    fn name(&self) -> &str {
        self.op.name()
    }

    fn parameters(&self) -> Vec<Param> {
        let mut parameters = vec![Param::value(self.field.as_str())];
        parameters.extend(self.op.parameters());
        parameters
    }
}

impl<S, Op> Function<S, Op::Output> for FieldProcessor<Op>
where
    S: FieldSource + ?Sized,
    Op: FieldOperation,
{
    fn apply(&self, input: &S) -> Option<Op::Output> {
        self.process_source(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl FieldOperation for Upper {
        type Kind = StringField;
        type Output = String;

        fn name(&self) -> &str {
            "upper"
        }

        fn process(&self, value: &str) -> Option<String> {
            Some(value.to_uppercase())
        }
    }

    #[test]
    fn test_field_processor_on_item() {
        let upper = FieldProcessor::new("name", Upper);
        let item = Item::new().with_field("name", "ada");
        assert_eq!(upper.apply(&item), Some("ADA".to_string()));
    }

    #[test]
    fn test_field_processor_missing_field() {
        let upper = FieldProcessor::new("name", Upper);
        let item = Item::new().with_field("other", "ada");
        assert_eq!(upper.apply(&item), None);
    }

    #[test]
    fn test_field_processor_wrong_kind() {
        let upper = FieldProcessor::new("name", Upper);
        let item = Item::new().with_field("name", 42);
        assert_eq!(upper.apply(&item), None);
    }

    #[test]
    fn test_field_processor_on_nested_map() {
        let upper = FieldProcessor::new("city", Upper);
        let home: Value = Item::new().with_field("city", "pittsburgh").into();
        assert_eq!(upper.apply(&home), Some("PITTSBURGH".to_string()));
        assert_eq!(upper.apply(&Value::from("not a map")), None);
    }

    #[test]
    fn test_field_processor_describe() {
        let upper = FieldProcessor::new("name", Upper);
        assert_eq!(upper.describe().to_string(), "upper(name)");
    }
}
