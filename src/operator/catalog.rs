//! Operator catalog for generated documentation.
//!
//! Every operator module registers an [`OperatorGroup`] describing the
//! constructors it exports. [`OperatorCatalog::builtin`] collects them and
//! [`OperatorCatalog::to_markdown`] renders one section per group:
//!
//! ```text
//! ## StringOperators
//! Module: `persona_streams::operator::string`
//!
//! Operators over a string field of an item.
//! ### Operators
//! | Input-->Output | Reference & Description |
//! |----|----|
//! | `Item`-->`String` | `hash(field, algorithm)` <br> Hex digest of the field. ... |
//! ```

use serde::Serialize;
use std::fmt;

/// One exported operator constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorEntry {
    pub signature: String,
    pub input: String,
    pub output: String,
    pub description: String,
}

impl fmt::Display for OperatorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| `{}`-->`{}` | `{}` <br> {} |",
            self.input, self.output, self.signature, self.description
        )
    }
}

/// Operators exported by one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorGroup {
    pub name: String,
    pub module: String,
    pub description: String,
    pub entries: Vec<OperatorEntry>,
}

impl OperatorGroup {
    pub fn new(
        name: impl Into<String>,
        module: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            description: description.into(),
            entries: Vec::new(),
        }
    }

    /// Register one operator constructor.
    pub fn entry(
        mut self,
        signature: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.entries.push(OperatorEntry {
            signature: signature.into(),
            input: input.into(),
            output: output.into(),
            description: description.into(),
        });
        self
    }
}

impl fmt::Display for OperatorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.name)?;
        writeln!(f, "Module: `{}`", self.module)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "### Operators")?;
        writeln!(f, "| Input-->Output | Reference & Description |")?;
        writeln!(f, "|----|----|")?;
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Registry of operator groups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OperatorCatalog {
    groups: Vec<OperatorGroup>,
}

impl OperatorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of every operator, stage and terminal shipped with the crate.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(super::string::catalog_group());
        catalog.register(super::list::catalog_group());
        catalog.register(super::compare::catalog_group());
        catalog.register(super::logic::catalog_group());
        catalog.register(super::time::catalog_group());
        catalog.register(crate::pipeline::provider::catalog_group());
        catalog.register(crate::pipeline::stages::catalog_group());
        catalog.register(crate::pipeline::terminal::catalog_group());
        catalog
    }

    /// Add a group. A group with the same name replaces the earlier one.
    pub fn register(&mut self, group: OperatorGroup) {
        if let Some(existing) = self.groups.iter_mut().find(|g| g.name == group.name) {
            *existing = group;
        } else {
            self.groups.push(group);
        }
    }

    pub fn groups(&self) -> &[OperatorGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&OperatorGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Render the whole catalog as a markdown document.
    pub fn to_markdown(&self) -> String {
        self.groups
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_row() {
        let group = OperatorGroup::new("G", "m", "d").entry("f(x)", "Item", "bool", "does f");
        assert_eq!(
            group.entries[0].to_string(),
            "| `Item`-->`bool` | `f(x)` <br> does f |"
        );
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut catalog = OperatorCatalog::new();
        catalog.register(OperatorGroup::new("G", "m", "first"));
        catalog.register(OperatorGroup::new("G", "m", "second"));
        assert_eq!(catalog.groups().len(), 1);
        assert_eq!(catalog.group("G").map(|g| g.description.as_str()), Some("second"));
    }

    #[test]
    fn test_builtin_markdown() {
        let markdown = OperatorCatalog::builtin().to_markdown();
        assert!(markdown.contains("## StringOperators"));
        assert!(markdown.contains("Module: `persona_streams::operator::string`"));
        assert!(markdown.contains("| Input-->Output | Reference & Description |"));
        assert!(markdown.contains("`hash(field, algorithm)`"));
        assert!(markdown.contains("`intersects(field, list)`"));
        assert!(markdown.contains("## Transformations"));
    }
}
