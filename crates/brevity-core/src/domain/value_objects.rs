//! Value objects for the generator domain.
//!
//! Element kinds are opaque to the engine: the catalog, merge, and walk only
//! ever compare them for equality. The handful of kinds with engine-level
//! meaning are named here.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Kind of the specification root node.
pub const ROOT_KIND: &str = "brevity";

/// Kind of every direct child of the root.
pub const PROJECT_KIND: &str = "project";

/// Prefix of the template that expands an element kind.
pub const MACRO_PREFIX: &str = "@macro.";

/// The discriminator on a node that selects its templates and actions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementKind(String);

impl ElementKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `project` elements are implicit and never required to have an agenda.
    pub fn is_project(&self) -> bool {
        self.0 == PROJECT_KIND
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_KIND
    }

    /// Name of the macro template governing this kind, e.g. `@macro.api`.
    pub fn macro_name(&self) -> String {
        format!("{MACRO_PREFIX}{}", self.0)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ElementKind {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for ElementKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

impl PartialEq<str> for ElementKind {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ElementKind {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_name_uses_convention() {
        assert_eq!(ElementKind::from("shortcut").macro_name(), "@macro.shortcut");
    }

    #[test]
    fn project_and_root_are_recognised() {
        assert!(ElementKind::from("project").is_project());
        assert!(!ElementKind::from("projects").is_project());
        assert!(ElementKind::from("brevity").is_root());
    }

    #[test]
    fn compares_with_str() {
        assert_eq!(ElementKind::from("cli"), "cli");
        assert_eq!(ElementKind::from("cli").to_string(), "cli");
    }
}
