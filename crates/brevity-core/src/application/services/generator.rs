//! Generator compilation.
//!
//! A [`Generator`] pairs a [`Catalog`] with the template engine holding the
//! templates it names. One is compiled per section from the library:
//!
//! ```text
//! <library>/<kind>/generator.brief          base definition
//! <library>/<kind>/<variation>.brief        optional, merged into the same catalog
//! <library>/<kind>/templates/*.tmpl         section templates
//! <library>/<kind>/templates/<variation>/   variation templates (dir names = variations)
//! ```
//!
//! followed by the `templates` globs of the root, project and section nodes.
//! Templates register under their file stem; later ones replace earlier ones.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    application::ports::{Filesystem, TemplateEngine},
    domain::{Catalog, Decoder, DomainError, DomainValidator, NodeId, Tree},
    error::{BrevityError, BrevityResult},
};

pub const GENERATOR_FILE: &str = "generator.brief";
pub const TEMPLATES_DIR: &str = "templates";
pub const TEMPLATE_EXTENSION: &str = "tmpl";
pub const DEFINITIONS: &str = "definitions";
pub const DEFINE: &str = "define";
/// Spec key holding a template glob relative to the spec file.
pub const TEMPLATES_KEY: &str = "templates";

/// Catalog plus the compiled templates for one section.
pub struct Generator {
    section: String,
    catalog: Catalog,
    engine: Box<dyn TemplateEngine>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("section", &self.section)
            .field("catalog", &self.catalog)
            .field("templates", &self.engine.template_names())
            .finish()
    }
}

impl Generator {
    pub fn new(section: impl Into<String>, engine: Box<dyn TemplateEngine>) -> Self {
        Self {
            section: section.into(),
            catalog: Catalog::new(),
            engine,
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn engine(&self) -> &dyn TemplateEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn TemplateEngine {
        self.engine.as_mut()
    }

    /// Macro template governing `kind`, if one was loaded.
    pub fn macro_for(&self, kind: &crate::domain::ElementKind) -> Option<String> {
        let name = kind.macro_name();
        self.engine.has_template(&name).then_some(name)
    }

    pub fn render(&self, name: &str, data: &Value) -> BrevityResult<String> {
        self.engine.render(name, data)
    }

    /// A generator about to walk a section needs a catalog, and templates
    /// if the catalog names any.
    pub fn ensure_ready(&self) -> BrevityResult<()> {
        if self.catalog.is_empty() {
            return Err(DomainError::EmptyCatalog {
                section: self.section.clone(),
            }
            .into());
        }
        if self.catalog.template_count() > 0 && self.engine.template_names().is_empty() {
            return Err(DomainError::NoTemplates {
                section: self.section.clone(),
            }
            .into());
        }
        Ok(())
    }

    pub fn validate_section(&mut self, tree: &Tree, section: NodeId) -> BrevityResult<()> {
        self.catalog
            .validate_section(tree, section)
            .map_err(BrevityError::from)
    }

    /// Register a generator definition document into this generator.
    ///
    /// `variation` selects which named `definitions` group applies.
    pub fn compile(&mut self, source: &str, source_name: &str, variation: &str) -> BrevityResult<()> {
        let mut tree = Tree::new();
        let roots = Decoder::new(source).decode_into(&mut tree)?;
        let root = match roots.as_slice() {
            [root] => *root,
            [] => {
                return Err(DomainError::InvalidGenerator {
                    source_name: source_name.to_string(),
                    section: crate::domain::validation::TEMPLATES_SECTION,
                }
                .into());
            }
            _ => {
                return Err(DomainError::GeneratorForms {
                    source_name: source_name.to_string(),
                    count: roots.len(),
                }
                .into());
            }
        };

        let (templates, actions) = DomainValidator::generator_sections(&tree, root, source_name)?;
        for (position, id) in tree.children(templates).iter().enumerate() {
            let node = tree.get(*id);
            DomainValidator::validate_template(node, position)?;
            let element = node.key("element").unwrap_or_default().to_string();
            self.catalog.add_template(&element, node.clone());
        }
        for (position, id) in tree.children(actions).iter().enumerate() {
            let node = tree.get(*id);
            DomainValidator::validate_action(node, position)?;
            let element = node.key("element").unwrap_or_default().to_string();
            self.catalog.add_action(&element, node.clone());
        }

        if let Some(definitions) = tree.child_of_kind(root, DEFINITIONS) {
            self.compile_definitions(&tree, definitions, variation)?;
        }
        debug!(
            source = source_name,
            kinds = self.catalog.len(),
            templates = self.catalog.template_count(),
            actions = self.catalog.action_count(),
            "compiled generator definition"
        );
        Ok(())
    }

    fn compile_definitions(&mut self, tree: &Tree, top: NodeId, variation: &str) -> BrevityResult<()> {
        let mut selected = None;
        for (position, id) in tree.children(top).iter().enumerate() {
            let node = tree.get(*id);
            if node.kind == DEFINE {
                self.define(node, position)?;
            } else if node.kind == DEFINITIONS {
                if node.name.is_empty() {
                    return Err(DomainError::UnnamedDefinitions {
                        section: self.section.clone(),
                    }
                    .into());
                }
                if !variation.is_empty() && node.name == variation {
                    selected = Some(*id);
                }
            }
        }
        if let Some(group) = selected {
            for (position, id) in tree.children(group).iter().enumerate() {
                let node = tree.get(*id);
                if node.kind == DEFINE {
                    self.define(node, position)?;
                }
            }
        }
        Ok(())
    }

    fn define(&mut self, node: &crate::domain::Node, position: usize) -> BrevityResult<()> {
        if node.name.is_empty() {
            return Err(DomainError::InvalidTemplateNode {
                position,
                line: node.line,
                reason: "define has no name".into(),
            }
            .into());
        }
        self.engine.register(&node.name, &node.content)
    }
}

/// Builds per-section generators from a library folder.
pub struct GeneratorCompiler<'a> {
    filesystem: &'a dyn Filesystem,
    library: &'a Path,
    spec_dir: &'a Path,
}

impl<'a> GeneratorCompiler<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, library: &'a Path, spec_dir: &'a Path) -> Self {
        Self {
            filesystem,
            library,
            spec_dir,
        }
    }

    /// Folder holding everything for one section kind.
    pub fn section_dir(&self, kind: &str) -> PathBuf {
        self.library.join(kind)
    }

    /// Variation names of a section kind, sorted.
    pub fn variations(&self, kind: &str) -> BrevityResult<Vec<String>> {
        self.filesystem
            .list_dirs(&self.section_dir(kind).join(TEMPLATES_DIR))
    }

    /// Compile the generator for the section at `section`.
    #[instrument(skip_all, fields(section = %tree.get(section).label()))]
    pub fn compile(
        &self,
        tree: &Tree,
        section: NodeId,
        engine: Box<dyn TemplateEngine>,
    ) -> BrevityResult<Generator> {
        let node = tree.get(section);
        let kind = node.kind.as_str();
        let variation = node.name.as_str();
        let dir = self.section_dir(kind);

        let variations = self.variations(kind)?;
        if !variations.is_empty() && !variations.iter().any(|v| v == variation) {
            return Err(DomainError::UndeclaredVariation {
                section: kind.to_string(),
                name: variation.to_string(),
                available: variations,
            }
            .into());
        }

        let mut generator = Generator::new(kind, engine);

        let base = dir.join(GENERATOR_FILE);
        if self.filesystem.exists(&base) {
            self.load_definition(&mut generator, &base, variation)?;
        } else {
            debug!(path = %base.display(), "no generator definition");
        }
        if !variation.is_empty() {
            let extra = dir.join(format!("{variation}.brief"));
            if self.filesystem.exists(&extra) {
                self.load_definition(&mut generator, &extra, variation)?;
            }
        }

        let templates = dir.join(TEMPLATES_DIR);
        self.load_glob(&mut generator, &templates.join(format!("*.{TEMPLATE_EXTENSION}")))?;
        if !variation.is_empty() && variations.iter().any(|v| v == variation) {
            self.load_glob(
                &mut generator,
                &templates.join(variation).join(format!("*.{TEMPLATE_EXTENSION}")),
            )?;
        }

        let mut chain: Vec<NodeId> = tree.ancestors(section).collect();
        chain.reverse();
        chain.push(section);
        for id in chain {
            if let Some(local) = tree.get(id).key(TEMPLATES_KEY) {
                self.load_glob(&mut generator, &self.spec_dir.join(local))?;
            }
        }

        debug!(
            templates = ?generator.engine().template_names(),
            "section templates"
        );
        Ok(generator)
    }

    fn load_definition(&self, generator: &mut Generator, path: &Path, variation: &str) -> BrevityResult<()> {
        let source = self.filesystem.read_to_string(path)?;
        generator.compile(&source, &path.display().to_string(), variation)
    }

    fn load_glob(&self, generator: &mut Generator, pattern: &Path) -> BrevityResult<()> {
        let pattern = pattern.to_string_lossy();
        for file in self.filesystem.glob(&pattern)? {
            let Some(name) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = self.filesystem.read_to_string(&file)?;
            generator.engine_mut().register(name, &source)?;
        }
        Ok(())
    }
}
