//! Time formatting operators.
//!
//! Providers stamp items with epoch milliseconds. `format(field, fmt)`
//! renders such a field with a chrono strftime string (UTC).

use crate::config::TimeSettings;
use crate::item::Value;
use crate::operator::catalog::OperatorGroup;
use crate::operator::field::{AnyField, FieldOperation, FieldProcessor};
use crate::operator::Param;
use chrono::format::{Item as FormatItem, StrftimeItems};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub struct FormatTime {
    format: String,
}

impl FieldOperation for FormatTime {
    type Kind = AnyField;
    type Output = String;

    fn name(&self) -> &str {
        "format_time"
    }

    fn parameters(&self) -> Vec<Param> {
        vec![Param::value(self.format.as_str())]
    }

    fn process(&self, value: &Value) -> Option<String> {
        let Some(millis) = value.as_i64() else {
            tracing::warn!(found = value.kind(), "Time field is not epoch milliseconds");
            return None;
        };

        let Some(time) = DateTime::<Utc>::from_timestamp_millis(millis) else {
            tracing::warn!(millis, "Timestamp out of range");
            return None;
        };

        let items: Vec<FormatItem<'_>> = StrftimeItems::new(&self.format).collect();
        if items.iter().any(|item| matches!(item, FormatItem::Error)) {
            tracing::warn!(format = %self.format, "Invalid time format");
            return None;
        }

        let mut out = String::new();
        write!(out, "{}", time.format_with_items(items.into_iter())).ok()?;
        Some(out)
    }
}

pub fn format(field: impl Into<String>, format: impl Into<String>) -> FieldProcessor<FormatTime> {
    FieldProcessor::new(
        field,
        FormatTime {
            format: format.into(),
        },
    )
}

/// Format with the configured default format.
pub fn format_default(settings: &TimeSettings, field: impl Into<String>) -> FieldProcessor<FormatTime> {
    format(field, settings.default_format.clone())
}

pub(crate) fn catalog_group() -> OperatorGroup {
    OperatorGroup::new(
        "TimeOperators",
        module_path!(),
        "Operators over epoch-millisecond time fields.",
    )
    .entry(
        "format(field, format)",
        "Item",
        "String",
        "Render the timestamp in UTC with a strftime format.",
    )
    .entry(
        "format_default(settings, field)",
        "Item",
        "String",
        "Render the timestamp with the configured default format.",
    )
}
