//! Macro expansion of project bodies.
//!
//! An element whose kind has a `@macro.<kind>` template is replaced by the
//! elements that template renders. Expansion repeats over the newly produced
//! elements until none of them has a macro, then the surviving elements are
//! merged by kind.

use std::collections::{BTreeSet, HashMap, hash_map::Entry};

use tracing::{debug, instrument};

use crate::{
    application::ports::TemplateEngine,
    domain::{Decoder, DomainError, NodeId, Tree, merge_nodes},
    error::BrevityResult,
};

use super::generator::{Generator, GeneratorCompiler, TEMPLATES_KEY};

/// Elements sharing kind, name and local template glob compile to the same
/// generator.
type GeneratorKey = (String, String, Option<String>);

/// Rounds of expansion allowed before a macro is considered runaway.
pub const MAX_EXPANSION_ROUNDS: usize = 32;

pub struct MacroExpander<'a> {
    compiler: &'a GeneratorCompiler<'a>,
    engines: &'a (dyn Fn() -> Box<dyn TemplateEngine> + Send + Sync),
}

impl<'a> MacroExpander<'a> {
    pub fn new(
        compiler: &'a GeneratorCompiler<'a>,
        engines: &'a (dyn Fn() -> Box<dyn TemplateEngine> + Send + Sync),
    ) -> Self {
        Self { compiler, engines }
    }

    /// Expand every macro element of `project` and replace its body with the
    /// merged result. Returns the number of rounds that expanded something.
    #[instrument(skip_all, fields(project = %tree.get(project).name))]
    pub fn expand_project(&self, tree: &mut Tree, project: NodeId) -> BrevityResult<usize> {
        let mut current = tree.children(project).to_vec();
        let mut body = Vec::new();
        let mut rounds = 0;
        let mut generators = HashMap::new();

        loop {
            let mut expanded = Vec::new();
            for node in current {
                match self.expand_node(tree, node, &mut generators)? {
                    Some(nodes) => expanded.extend(nodes),
                    None => body.push(node),
                }
            }
            if expanded.is_empty() {
                break;
            }
            if rounds == MAX_EXPANSION_ROUNDS {
                let pending: BTreeSet<String> = expanded
                    .iter()
                    .map(|id| tree.get(*id).kind.to_string())
                    .collect();
                return Err(DomainError::MacroExpansionLimit {
                    limit: MAX_EXPANSION_ROUNDS,
                    pending: pending.into_iter().collect(),
                }
                .into());
            }
            rounds += 1;
            current = expanded;
        }

        let merged = merge_nodes(tree, body, false);
        tree.set_body(project, merged);
        debug!(rounds, sections = tree.children(project).len(), "macros expanded");
        Ok(rounds)
    }

    /// Replacement nodes for `node`, or `None` when its kind has no macro.
    fn expand_node(
        &self,
        tree: &mut Tree,
        node: NodeId,
        generators: &mut HashMap<GeneratorKey, Generator>,
    ) -> BrevityResult<Option<Vec<NodeId>>> {
        let key = {
            let spec = tree.get(node);
            (
                spec.kind.to_string(),
                spec.name.clone(),
                spec.key(TEMPLATES_KEY).map(str::to_string),
            )
        };
        let generator = match generators.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(self.compiler.compile(tree, node, (self.engines)())?)
            }
        };
        let Some(name) = generator.macro_for(&tree.get(node).kind) else {
            return Ok(None);
        };

        let rendered = generator.render(&name, &tree.context(node))?;
        debug!(
            "macro:\n{}expansion:\n{}",
            tree.encode(node),
            rendered
        );

        let parent = tree.parent(node);
        let padding = parent.map(|p| tree.get(p).indent).unwrap_or_default();
        let nodes = Decoder::new(&rendered).padding(padding).decode_into(tree)?;
        for id in &nodes {
            tree.set_parent(*id, parent);
        }
        Ok(Some(nodes))
    }
}
