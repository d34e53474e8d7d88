//! Core data types for persona-streams
//!
//! An [`Item`] is one record flowing through a pipeline: an ordered mapping
//! from field name to [`Value`]. Items are immutable once built. Stages that
//! want a modified record build a new one with [`Item::with_field`], which
//! consumes the original.
//!
//! # Values
//!
//! [`Value`] covers everything a provider can emit:
//! - `Null`, `Bool`, `Int`, `Float`, `Str` for scalars
//! - `List` for sequences (contacts, recipients, tags...)
//! - `Map` for nested records
//!
//! Values (de)serialize as plain JSON, so an item round-trips through a
//! JSON object without any tagging.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A polymorphic field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Short name of the value's kind, used in log messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value. Ints widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Compare two values of compatible kinds.
    ///
    /// Numbers compare numerically across `Int`/`Float`, strings and bools
    /// compare naturally. Anything else (including NaN) is unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Equality with numeric widening (`Int(1)` equals `Float(1.0)`)
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            _ => self == other,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(list: Vec<T>) -> Self {
        Value::List(list.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Item> for Value {
    fn from(item: Item) -> Self {
        Value::Map(item.fields)
    }
}

/// One immutable record flowing through a pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item {
    fields: IndexMap<String, Value>,
}

impl Item {
    /// Create an empty item
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new item with `name` set to `value`.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Return a new item keeping only the named fields, in the given order
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Self {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.fields
                    .get(name)
                    .map(|v| (name.to_string(), v.clone()))
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.fields
    }

    /// Parse an item from JSON text, keeping the document's field order
    pub fn parse_json(text: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build an item from a JSON object. Other JSON shapes yield `None`.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match json {
            serde_json::Value::Object(_) => serde_json::from_value(json).ok(),
            _ => None,
        }
    }

    /// Encode the item as a single-line JSON object
    pub fn to_json_string(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Item {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<IndexMap<String, Value>> for Item {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Map(self.fields.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_field_order() {
        let item = Item::new()
            .with_field("b", 2)
            .with_field("a", 1)
            .with_field("b", 3);

        let keys: Vec<_> = item.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(item.get("b"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_item_project() {
        let item: Item = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        let projected = item.project(&["z", "missing", "x"]);
        let keys: Vec<_> = projected.keys().collect();
        assert_eq!(keys, vec!["z", "x"]);
    }

    #[test]
    fn test_item_json_shapes() {
        let item = Item::parse_json(
            r#"{"name": "alice", "age": 31, "score": 0.5, "tags": ["a", "b"],
                "home": {"city": "Pittsburgh"}, "phone": null}"#,
        )
        .unwrap();

        assert_eq!(item.get("age"), Some(&Value::Int(31)));
        assert_eq!(item.get("score"), Some(&Value::Float(0.5)));
        assert_eq!(item.get("phone"), Some(&Value::Null));
        assert_eq!(item.get("tags").and_then(Value::as_list).map(|l| l.len()), Some(2));
        assert!(item.get("home").and_then(Value::as_map).is_some());

        let encoded = item.to_json_string().unwrap();
        assert!(encoded.starts_with("{\"name\":\"alice\""));
    }

    #[test]
    fn test_item_from_non_object_json() {
        assert!(Item::from_json(serde_json::json!({"v": 1})).is_some());
        assert!(Item::parse_json("[1, 2]").is_err());
        assert!(Item::from_json(serde_json::json!([1, 2])).is_none());
        assert!(Item::from_json(serde_json::json!("text")).is_none());
    }

    #[test]
    fn test_value_compare() {
        assert_eq!(Value::Int(1).compare(&Value::Float(1.5)), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::Int(1).compare(&Value::from("1")), None);
        assert!(Value::Int(2).loose_eq(&Value::Float(2.0)));
        assert!(!Value::Int(2).loose_eq(&Value::from("2")));
    }

    #[test]
    fn test_value_display() {
        let v = Value::from(vec![Value::from(1), Value::from("x")]);
        assert_eq!(v.to_string(), "[1, x]");
        let item = Item::new().with_field("v", 2);
        assert_eq!(item.to_string(), "{v: 2}");
    }
}
