//! Test data builders for creating test objects

use persona_streams::{Item, Value};

/// Builder for call-log style test items
pub struct ItemBuilder {
    caller: String,
    duration: i64,
    tags: Vec<String>,
    time_created: i64,
    extra: Vec<(String, Value)>,
}

impl ItemBuilder {
    pub fn new(caller: &str) -> Self {
        Self {
            caller: caller.to_string(),
            duration: 60,
            tags: Vec::new(),
            time_created: 1_483_228_800_000,
            extra: Vec::new(),
        }
    }

    pub fn duration(mut self, seconds: i64) -> Self {
        self.duration = seconds;
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn time_created(mut self, millis: i64) -> Self {
        self.time_created = millis;
        self
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.push((name.to_string(), value.into()));
        self
    }

    pub fn build(self) -> Item {
        let mut item = Item::new()
            .with_field("caller", self.caller)
            .with_field("duration", self.duration)
            .with_field("tags", self.tags)
            .with_field("time_created", self.time_created);
        for (name, value) in self.extra {
            item = item.with_field(name, value);
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder() {
        let item = ItemBuilder::new("alice")
            .duration(90)
            .tag("work")
            .field("starred", true)
            .build();

        assert_eq!(item.get("caller").and_then(|v| v.as_str()), Some("alice"));
        assert_eq!(item.get("duration").and_then(|v| v.as_i64()), Some(90));
        assert_eq!(item.get("tags").and_then(|v| v.as_list()).map(|l| l.len()), Some(1));
        assert_eq!(item.get("starred"), Some(&Value::Bool(true)));
    }
}
