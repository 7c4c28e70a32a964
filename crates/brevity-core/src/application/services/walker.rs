//! Applying a generator to a specification tree.
//!
//! Templates of a node run before its children are visited; actions run
//! after every descendant has finished. Within a node both follow the
//! declaration order of their dictionary. The first failure stops the walk.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ActionRunner, Filesystem, TemplateEngine},
    },
    domain::{Node, NodeId, Tree},
    error::BrevityResult,
};

use super::generator::Generator;

/// Marker that switches a value from literal text to a template.
const TEMPLATE_OPEN: &str = "{{";

/// One unit of work performed (or, for actions in render-only mode,
/// skipped) during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    File {
        template: String,
        element: String,
        path: PathBuf,
    },
    Action {
        action: String,
        element: String,
        command: Vec<String>,
        executed: bool,
    },
}

/// Ordered record of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub projects: Vec<String>,
    pub steps: Vec<Step>,
}

impl GenerationReport {
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.steps.iter().filter_map(|step| match step {
            Step::File { path, .. } => Some(path.as_path()),
            Step::Action { .. } => None,
        })
    }

    pub fn actions(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .filter(|step| matches!(step, Step::Action { .. }))
    }
}

/// Render `value` against `data` unless it is plain text.
pub fn resolve_value(engine: &dyn TemplateEngine, value: &str, data: &Value) -> BrevityResult<String> {
    if !value.contains(TEMPLATE_OPEN) {
        return Ok(value.to_string());
    }
    engine.render_str(value, data)
}

/// Location of a generated file relative to the project folder.
///
/// Trailing line breaks left by templated values are dropped; any other
/// whitespace is kept. Absolute paths are re-rooted under the folder and
/// `..` is rejected, so every file stays inside it.
pub fn output_path(template: &str, value: &str) -> BrevityResult<PathBuf> {
    let value = value.trim_end_matches(['\r', '\n']);
    let invalid = |reason: &str| ApplicationError::InvalidFilePath {
        template: template.to_string(),
        path: value.to_string(),
        reason: reason.to_string(),
    };

    let mut relative = PathBuf::new();
    for component in Path::new(value).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => return Err(invalid("must not contain '..'").into()),
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(invalid("does not name a file").into());
    }
    Ok(relative)
}

/// Walks one tree with one generator, writing files and running actions.
pub struct Walker<'a> {
    generator: &'a Generator,
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn ActionRunner,
    render_only: bool,
    steps: Vec<Step>,
}

impl<'a> Walker<'a> {
    pub fn new(
        generator: &'a Generator,
        filesystem: &'a dyn Filesystem,
        runner: &'a dyn ActionRunner,
        render_only: bool,
    ) -> Self {
        Self {
            generator,
            filesystem,
            runner,
            render_only,
            steps: Vec::new(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Templates for `node`, then every child, then actions for `node`.
    pub fn walk(&mut self, tree: &Tree, node: NodeId, dir: &Path) -> BrevityResult<()> {
        self.apply_templates(tree, node, dir)?;
        for child in tree.children(node) {
            self.walk(tree, *child, dir)?;
        }
        self.apply_actions(tree, node, dir)
    }

    pub fn apply_templates(&mut self, tree: &Tree, node: NodeId, dir: &Path) -> BrevityResult<()> {
        let generator = self.generator;
        let Some(agenda) = generator.catalog().get(tree.get(node).kind.as_str()) else {
            return Ok(());
        };
        if agenda.templates.is_empty() {
            return Ok(());
        }
        let data = tree.context(node);
        for template in agenda.templates.iter() {
            self.generate_file(template, tree.get(node), &data, dir)?;
        }
        Ok(())
    }

    pub fn apply_actions(&mut self, tree: &Tree, node: NodeId, dir: &Path) -> BrevityResult<()> {
        let generator = self.generator;
        let Some(agenda) = generator.catalog().get(tree.get(node).kind.as_str()) else {
            return Ok(());
        };
        if agenda.actions.is_empty() {
            return Ok(());
        }
        let data = tree.context(node);
        for action in agenda.actions.iter() {
            self.run_action(action, tree.get(node), &data, dir)?;
        }
        Ok(())
    }

    /// Render one template for `spec` into the file named by its `file` key.
    #[instrument(skip_all, fields(template = %template.name, element = %spec.label()))]
    pub fn generate_file(
        &mut self,
        template: &Node,
        spec: &Node,
        data: &Value,
        dir: &Path,
    ) -> BrevityResult<()> {
        let generator = self.generator;
        let engine = generator.engine();
        if !engine.has_template(&template.name) {
            return Err(ApplicationError::TemplateNotFound {
                name: template.name.clone(),
            }
            .into());
        }

        let file = template.key("file").unwrap_or_default();
        let relative = resolve_value(engine, file, data)?;
        let path = dir.join(output_path(&template.name, &relative)?);
        info!(path = %path.display(), "template {} on {}", template.name, spec.label());

        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        let content = engine.render(&template.name, data)?;
        self.filesystem.write_file(&path, &content)?;

        self.steps.push(Step::File {
            template: template.name.clone(),
            element: spec.label(),
            path,
        });
        Ok(())
    }

    /// Resolve and run one action for `spec` with `dir` as working directory.
    #[instrument(skip_all, fields(action = %action.name, element = %spec.label()))]
    pub fn run_action(
        &mut self,
        action: &Node,
        spec: &Node,
        data: &Value,
        dir: &Path,
    ) -> BrevityResult<()> {
        let exec = action.key("exec").unwrap_or_default();
        let command = resolve_value(self.generator.engine(), exec, data)?;
        let args = match shlex::split(&command) {
            Some(args) if !args.is_empty() => args,
            _ => {
                return Err(ApplicationError::ActionParse {
                    action: action.name.clone(),
                    command,
                }
                .into());
            }
        };
        info!("action {} on {} exec: {}", action.name, spec.label(), args.join(" "));

        if self.render_only {
            debug!(element = action.key("element").unwrap_or_default(), "render only, skipping action");
            self.steps.push(Step::Action {
                action: action.name.clone(),
                element: spec.label(),
                command: args,
                executed: false,
            });
            return Ok(());
        }

        let output = self
            .runner
            .run(&args[0], &args[1..], dir)
            .map_err(|e| ApplicationError::ActionSpawn {
                action: action.name.clone(),
                program: args[0].clone(),
                reason: e.to_string(),
            })?;

        if !output.success {
            error!(
                action = %action.name,
                dir = %dir.display(),
                output = %output.output,
                "failed action"
            );
            return Err(ApplicationError::ActionFailed {
                action: action.name.clone(),
                command: args.join(" "),
                code: output.code,
                output: output.output,
            }
            .into());
        }
        debug!(output = %output.output, "action finished");

        self.steps.push(Step::Action {
            action: action.name.clone(),
            element: spec.label(),
            command: args,
            executed: true,
        });
        Ok(())
    }
}
