//! Arena-backed specification tree.
//!
//! Every node lives in a single [`Tree`] and is addressed by [`NodeId`].
//! Parent links are plain indices, so upward lookup (section → project →
//! root) never creates an ownership cycle.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::value_objects::ElementKind;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A typed, named, keyed element of a specification document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub kind: ElementKind,
    pub name: String,
    pub content: String,
    pub keys: BTreeMap<String, String>,
    pub(crate) body: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Column the element was declared at, including decoder padding.
    pub indent: usize,
    /// 1-based source line, 0 for synthesised nodes.
    pub line: usize,
}

impl Node {
    pub fn new(kind: impl Into<ElementKind>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(key.into(), value.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn key(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Copy of this node with no structural links, for storage outside the tree.
    pub fn detached(&self) -> Self {
        Self {
            body: Vec::new(),
            parent: None,
            ..self.clone()
        }
    }

    /// `kind:name` label used in logs and error messages.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.kind.to_string()
        } else {
            format!("{}:{}", self.kind, self.name)
        }
    }
}

/// Owner of every node of one or more specification documents.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store a node without attaching it anywhere.
    pub fn alloc(&mut self, mut node: Node) -> NodeId {
        node.body.clear();
        node.parent = None;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Store a node and append it to `parent`'s body.
    pub fn add(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = self.alloc(node);
        if let Some(parent) = parent {
            self.nodes[id.0].parent = Some(parent);
            self.nodes[parent.0].body.push(id);
        }
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].body
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
    }

    /// Replace a node's body wholesale and point every member back at it.
    pub fn set_body(&mut self, id: NodeId, body: Vec<NodeId>) {
        for child in &body {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes[id.0].body = body;
    }

    /// First direct child of the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.get(*child).kind == kind)
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Every node of the sub-tree rooted at `id`, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Data view handed to templates.
    ///
    /// `body` is expanded recursively; `parent` is the chain of ancestors
    /// without their bodies, so `{{parent.parent.name}}` reaches the project
    /// from inside a section.
    pub fn context(&self, id: NodeId) -> Value {
        let mut view = self.fields(id);
        let body = self
            .children(id)
            .iter()
            .map(|child| self.body_view(*child))
            .collect();
        view.insert("body".into(), Value::Array(body));
        view.insert("parent".into(), self.parent_view(self.parent(id)));
        Value::Object(view)
    }

    fn body_view(&self, id: NodeId) -> Value {
        let mut view = self.fields(id);
        let body = self
            .children(id)
            .iter()
            .map(|child| self.body_view(*child))
            .collect();
        view.insert("body".into(), Value::Array(body));
        Value::Object(view)
    }

    fn parent_view(&self, id: Option<NodeId>) -> Value {
        match id {
            None => Value::Null,
            Some(id) => {
                let mut view = self.fields(id);
                view.insert("parent".into(), self.parent_view(self.parent(id)));
                Value::Object(view)
            }
        }
    }

    fn fields(&self, id: NodeId) -> Map<String, Value> {
        let node = self.get(id);
        let keys = node
            .keys
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        let mut view = Map::new();
        view.insert("type".into(), Value::String(node.kind.to_string()));
        view.insert("name".into(), Value::String(node.name.clone()));
        view.insert("content".into(), Value::String(node.content.clone()));
        view.insert("keys".into(), Value::Object(keys));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.add(Node::new("brevity"), None);
        let project = tree.add(Node::new("project").named("demo"), Some(root));
        let cli = tree.add(
            Node::new("cli").named("cobra").with_key("module", "x/demo"),
            Some(project),
        );
        (tree, root, project, cli)
    }

    #[test]
    fn add_links_parent_and_body() {
        let (tree, root, project, cli) = sample();
        assert_eq!(tree.children(root), &[project]);
        assert_eq!(tree.parent(cli), Some(project));
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (tree, root, project, cli) = sample();
        let chain: Vec<_> = tree.ancestors(cli).collect();
        assert_eq!(chain, vec![project, root]);
    }

    #[test]
    fn set_body_reparents_members() {
        let (mut tree, root, project, cli) = sample();
        tree.set_body(root, vec![project, cli]);
        assert_eq!(tree.parent(cli), Some(root));
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn child_of_kind_finds_first_match() {
        let (tree, _, project, cli) = sample();
        assert_eq!(tree.child_of_kind(project, "cli"), Some(cli));
        assert_eq!(tree.child_of_kind(project, "backend"), None);
    }

    #[test]
    fn context_exposes_keys_body_and_parent_chain() {
        let (tree, _, project, cli) = sample();
        let ctx = tree.context(cli);
        assert_eq!(ctx["type"], "cli");
        assert_eq!(ctx["keys"]["module"], "x/demo");
        assert_eq!(ctx["parent"]["name"], "demo");
        assert_eq!(ctx["parent"]["parent"]["type"], "brevity");

        let ctx = tree.context(project);
        assert_eq!(ctx["body"][0]["name"], "cobra");
    }

    #[test]
    fn descendants_are_pre_order() {
        let (tree, root, project, cli) = sample();
        assert_eq!(tree.descendants(root), vec![root, project, cli]);
    }

    #[test]
    fn detached_drops_links() {
        let (tree, _, project, _) = sample();
        let copy = tree.get(project).detached();
        assert!(copy.body().is_empty());
        assert!(copy.parent().is_none());
        assert_eq!(copy.label(), "project:demo");
    }
}
