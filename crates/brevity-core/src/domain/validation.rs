use crate::domain::{
    entities::node::{Node, NodeId, Tree},
    error::DomainError,
    value_objects::{PROJECT_KIND, ROOT_KIND},
};

/// Child sections every generator definition must carry.
pub const TEMPLATES_SECTION: &str = "templates";
pub const ACTIONS_SECTION: &str = "actions";

/// Centralized shape validation for specification and generator documents.
pub struct DomainValidator;

impl DomainValidator {
    /// Root must be `brevity` and every direct child a `project`.
    pub fn validate_spec(tree: &Tree, root: NodeId) -> Result<(), DomainError> {
        let node = tree.get(root);
        if !node.kind.is_root() {
            return Err(DomainError::InvalidSpec(format!(
                "top-level element must be '{ROOT_KIND}', found '{}'",
                node.kind
            )));
        }
        for (position, child) in tree.children(root).iter().enumerate() {
            let child = tree.get(*child);
            if !child.kind.is_project() {
                return Err(DomainError::InvalidSpec(format!(
                    "element {position} (line {}) must be '{PROJECT_KIND}', found '{}'",
                    child.line, child.kind
                )));
            }
        }
        Ok(())
    }

    /// A project name becomes a single destination folder.
    pub fn validate_project(node: &Node, position: usize) -> Result<(), DomainError> {
        let name = node.name.as_str();
        if name.is_empty() {
            return Err(DomainError::UnnamedProject { position });
        }
        let reason = if name == "." || name == ".." {
            Some("must not be a relative directory marker")
        } else if name.contains(['/', '\\']) {
            Some("must not contain path separators")
        } else if name.contains('\0') {
            Some("must not contain NUL")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(DomainError::InvalidProjectName {
                name: name.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Locate the `templates` and `actions` sections of a generator document.
    pub fn generator_sections(
        tree: &Tree,
        root: NodeId,
        source_name: &str,
    ) -> Result<(NodeId, NodeId), DomainError> {
        let missing = |section| DomainError::InvalidGenerator {
            source_name: source_name.to_string(),
            section,
        };
        let templates = tree
            .child_of_kind(root, TEMPLATES_SECTION)
            .ok_or_else(|| missing(TEMPLATES_SECTION))?;
        let actions = tree
            .child_of_kind(root, ACTIONS_SECTION)
            .ok_or_else(|| missing(ACTIONS_SECTION))?;
        Ok((templates, actions))
    }

    /// Templates need a name plus `element` and `file` keys.
    pub fn validate_template(node: &Node, position: usize) -> Result<(), DomainError> {
        let reason = Self::missing_field(node, "file");
        match reason {
            Some(reason) => Err(DomainError::InvalidTemplateNode {
                position,
                line: node.line,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Actions need a name plus `element` and `exec` keys.
    pub fn validate_action(node: &Node, position: usize) -> Result<(), DomainError> {
        let reason = Self::missing_field(node, "exec");
        match reason {
            Some(reason) => Err(DomainError::InvalidActionNode {
                position,
                line: node.line,
                reason,
            }),
            None => Ok(()),
        }
    }

    fn missing_field(node: &Node, required: &str) -> Option<String> {
        if node.name.is_empty() {
            return Some("has no name".to_string());
        }
        for key in ["element", required] {
            match node.key(key) {
                Some(value) if !value.is_empty() => {}
                _ => return Some(format!("'{}' missing {key} keyword", node.name)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brief::decode;

    #[test]
    fn spec_requires_brevity_root_and_projects() {
        let (tree, roots) = decode("brevity\n    project:a\n    project:b\n").unwrap();
        assert!(DomainValidator::validate_spec(&tree, roots[0]).is_ok());

        let (tree, roots) = decode("spec\n    project:a\n").unwrap();
        assert!(matches!(
            DomainValidator::validate_spec(&tree, roots[0]),
            Err(DomainError::InvalidSpec(_))
        ));

        let (tree, roots) = decode("brevity\n    project:a\n    cli\n").unwrap();
        let err = DomainValidator::validate_spec(&tree, roots[0]).unwrap_err();
        assert!(err.to_string().contains("element 1 (line 3)"));
    }

    #[test]
    fn project_names_are_single_folders() {
        assert!(DomainValidator::validate_project(&Node::new("project").named("demo"), 0).is_ok());
        assert_eq!(
            DomainValidator::validate_project(&Node::new("project"), 2),
            Err(DomainError::UnnamedProject { position: 2 })
        );
        for bad in ["..", "a/b", r"a\b"] {
            assert!(matches!(
                DomainValidator::validate_project(&Node::new("project").named(bad), 0),
                Err(DomainError::InvalidProjectName { .. })
            ));
        }
    }

    #[test]
    fn generator_needs_both_sections() {
        let (tree, roots) = decode("generator\n    templates\n").unwrap();
        assert_eq!(
            DomainValidator::generator_sections(&tree, roots[0], "cli/generator.brief"),
            Err(DomainError::InvalidGenerator {
                source_name: "cli/generator.brief".into(),
                section: ACTIONS_SECTION,
            })
        );

        let (tree, roots) = decode("generator\n    actions\n").unwrap();
        assert!(matches!(
            DomainValidator::generator_sections(&tree, roots[0], "g"),
            Err(DomainError::InvalidGenerator { section: "templates", .. })
        ));
    }

    #[test]
    fn template_and_action_nodes_need_required_keys() {
        let (tree, roots) = decode(
            "t:main element:cli file:main.go\nt element:cli file:x\nt:nofile element:cli\na:init element:cli\n",
        )
        .unwrap();
        assert!(DomainValidator::validate_template(tree.get(roots[0]), 0).is_ok());

        let err = DomainValidator::validate_template(tree.get(roots[1]), 1).unwrap_err();
        assert_eq!(err.to_string(), "template 1 (line 2): has no name");

        let err = DomainValidator::validate_template(tree.get(roots[2]), 2).unwrap_err();
        assert_eq!(err.to_string(), "template 2 (line 3): 'nofile' missing file keyword");

        let err = DomainValidator::validate_action(tree.get(roots[3]), 0).unwrap_err();
        assert_eq!(err.to_string(), "action 0 (line 4): 'init' missing exec keyword");
    }
}
