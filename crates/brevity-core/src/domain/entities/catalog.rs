//! What to do for each element kind.
//!
//! A [`Catalog`] maps an element kind to its [`Agenda`]: the templates and
//! actions a generator definition registered for that kind, in declaration
//! order.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{
    entities::node::{Node, NodeId, Tree},
    error::DomainError,
    value_objects::ElementKind,
};

/// Ordered, name-indexed collection of template or action nodes.
///
/// The list keeps every node in insertion order and defines execution
/// order. Named nodes are also indexed; on duplicate names the last one
/// wins the index while both remain in the list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    list: Vec<Node>,
    map: HashMap<String, usize>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: Node) {
        let node = node.detached();
        if !node.name.is_empty() {
            self.map.insert(node.name.clone(), self.list.len());
        }
        self.list.push(node);
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.map.get(name).map(|index| &self.list[*index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Templates and actions registered for one element kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Agenda {
    pub templates: Dictionary,
    pub actions: Dictionary,
    /// Set by section validation when the kind occurs in the section.
    pub found: bool,
}

impl Agenda {
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty() && self.actions.is_empty()
    }
}

/// Registry from element kind to [`Agenda`], owned by one generator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    agendas: BTreeMap<ElementKind, Agenda>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: &str) -> Option<&Agenda> {
        self.agendas.get(kind)
    }

    pub fn get_or_create(&mut self, kind: impl Into<ElementKind>) -> &mut Agenda {
        self.agendas.entry(kind.into()).or_default()
    }

    /// Register a template node under its `element` key.
    pub fn add_template(&mut self, element: &str, node: Node) {
        self.get_or_create(element).templates.add(node);
    }

    /// Register an action node under its `element` key.
    pub fn add_action(&mut self, element: &str, node: Node) {
        self.get_or_create(element).actions.add(node);
    }

    /// True when no kind has any template or action.
    pub fn is_empty(&self) -> bool {
        self.agendas.values().all(Agenda::is_empty)
    }

    pub fn len(&self) -> usize {
        self.agendas.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementKind, &Agenda)> {
        self.agendas.iter()
    }

    pub fn template_count(&self) -> usize {
        self.agendas.values().map(|a| a.templates.len()).sum()
    }

    pub fn action_count(&self) -> usize {
        self.agendas.values().map(|a| a.actions.len()).sum()
    }

    /// Check that every kind this catalog acts on occurs in the section.
    ///
    /// `project` is implicit and never required. All missing kinds are
    /// reported together, sorted.
    pub fn validate_section(&mut self, tree: &Tree, section: NodeId) -> Result<(), DomainError> {
        for agenda in self.agendas.values_mut() {
            agenda.found = false;
        }
        for id in tree.descendants(section) {
            if let Some(agenda) = self.agendas.get_mut(tree.get(id).kind.as_str()) {
                agenda.found = true;
            }
        }

        let elements: Vec<String> = self
            .agendas
            .iter()
            .filter(|(kind, agenda)| !kind.is_project() && !agenda.found && !agenda.is_empty())
            .map(|(kind, _)| kind.to_string())
            .collect();

        if elements.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingElements {
                section: tree.get(section).kind.to_string(),
                elements,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::brief::decode;

    fn template(name: &str, element: &str) -> Node {
        Node::new("template")
            .named(name)
            .with_key("element", element)
            .with_key("file", format!("{name}.txt"))
    }

    #[test]
    fn dictionary_keeps_order_and_last_name_wins() {
        let mut dict = Dictionary::new();
        dict.add(template("a", "cli").with_key("v", "1"));
        dict.add(Node::new("template").with_key("element", "cli"));
        dict.add(template("a", "cli").with_key("v", "2"));

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("a").and_then(|n| n.key("v")), Some("2"));
        let names: Vec<_> = dict.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "", "a"]);
    }

    #[test]
    fn get_never_creates() {
        let mut catalog = Catalog::new();
        assert!(catalog.get("cli").is_none());
        assert!(catalog.get_or_create("cli").is_empty());
        assert!(catalog.get("cli").is_some());
        assert!(catalog.is_empty());
    }

    #[test]
    fn add_registers_under_element() {
        let mut catalog = Catalog::new();
        catalog.add_template("cli", template("main", "cli"));
        catalog.add_action("command", Node::new("action").named("fmt"));
        assert_eq!(catalog.template_count(), 1);
        assert_eq!(catalog.action_count(), 1);
        assert_eq!(catalog.get("command").map(|a| a.actions.len()), Some(1));
        assert!(!catalog.is_empty());
    }

    #[test]
    fn validate_section_reports_missing_kinds_sorted() {
        let (tree, roots) = decode("cli:cobra\n    command:serve\n").unwrap();
        let mut catalog = Catalog::new();
        catalog.add_template("cli", template("main", "cli"));
        catalog.add_template("flag", template("flag", "flag"));
        catalog.add_template("command", template("cmd", "command"));
        catalog.add_template("arg", template("arg", "arg"));
        catalog.add_template("project", template("readme", "project"));

        let err = catalog.validate_section(&tree, roots[0]).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingElements {
                section: "cli".into(),
                elements: vec!["arg".into(), "flag".into()],
            }
        );
        assert!(catalog.get("command").is_some_and(|a| a.found));
    }

    #[test]
    fn validate_section_passes_when_all_present() {
        let (tree, roots) = decode("cli\n    command:a\n    command:b\n").unwrap();
        let mut catalog = Catalog::new();
        catalog.add_template("cli", template("main", "cli"));
        catalog.add_action("command", Node::new("action").named("go"));
        assert!(catalog.validate_section(&tree, roots[0]).is_ok());
    }
}
