//! Reconciling sibling elements.
//!
//! After macro expansion a project body may hold several elements of the
//! same kind: one written by hand, others produced by macros. They are
//! folded into the first occurrence. Explicit fields of the earlier node
//! win; bodies are unioned and merged again by kind and name.

use crate::domain::entities::node::{NodeId, Tree};

/// Fold `nodes` into one node per group.
///
/// Groups are keyed by kind, plus name when `use_names` is set. The result
/// keeps the order in which each group first appeared.
pub fn merge_nodes(tree: &mut Tree, nodes: Vec<NodeId>, use_names: bool) -> Vec<NodeId> {
    let mut result = Vec::new();
    let mut current = nodes;

    while !current.is_empty() {
        let target = current.remove(0);
        let mut remain = Vec::new();
        for next in current {
            if same_group(tree, target, next, use_names) {
                merge_node(tree, target, next);
            } else {
                remain.push(next);
            }
        }
        result.push(target);
        current = remain;
    }

    result
}

/// Fold `other` into `target`. `other` is left orphaned in the arena.
pub fn merge_node(tree: &mut Tree, target: NodeId, other: NodeId) {
    if target == other {
        return;
    }
    let donor = tree.get(other).clone();
    let node = tree.get_mut(target);

    for (key, value) in donor.keys {
        node.keys.entry(key).or_insert(value);
    }
    if node.name.is_empty() {
        node.name = donor.name;
    }
    if node.content.is_empty() {
        node.content = donor.content;
    }

    let mut body = node.body.clone();
    body.extend(donor.body);
    let body = merge_nodes(tree, body, true);
    tree.set_body(target, body);
}

fn same_group(tree: &Tree, a: NodeId, b: NodeId, use_names: bool) -> bool {
    let (a, b) = (tree.get(a), tree.get(b));
    a.kind == b.kind && (!use_names || a.name == b.name)
}
