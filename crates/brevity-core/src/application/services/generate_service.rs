//! Generate Service - main application orchestrator.
//!
//! For each project of a specification, in order:
//! 1. Expand macros in the project body and merge the result
//! 2. Compile and validate a generator for every section
//! 3. Create the project folder
//! 4. Project templates of every section's generator, then a walk of each
//!    section, then project actions of every generator
//!
//! The project node is the parent of all sections, so its actions run only
//! after every section has finished. Every section of a project validates
//! before any of its files is written. Processing stops at the first error.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ActionRunner, Filesystem, TemplateEngine},
    },
    domain::{Decoder, DomainError, DomainValidator, NodeId, Tree},
    error::BrevityResult,
};

use super::{
    generator::{GENERATOR_FILE, Generator, GeneratorCompiler, TEMPLATE_EXTENSION, TEMPLATES_DIR},
    macros::MacroExpander,
    walker::{GenerationReport, Walker},
};

/// Creates a fresh template engine for each generator.
pub type EngineFactory = Box<dyn Fn() -> Box<dyn TemplateEngine> + Send + Sync>;

/// Settings shared by every generator of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Root of the section library.
    pub library: PathBuf,
    /// Report actions instead of running them.
    pub render_only: bool,
}

/// A decoded specification document.
#[derive(Debug, Clone)]
pub struct Specification {
    pub tree: Tree,
    pub root: NodeId,
    /// Folder the document was read from; local template globs are relative to it.
    pub dir: PathBuf,
}

impl Specification {
    /// Decode and shape-check a specification held in memory.
    pub fn parse(source: &str, dir: impl Into<PathBuf>) -> BrevityResult<Self> {
        let mut tree = Tree::new();
        let roots = Decoder::new(source).decode_into(&mut tree)?;
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(DomainError::InvalidSpec("document is empty".into()).into()),
            _ => {
                return Err(DomainError::InvalidSpec(format!(
                    "document has {} top-level forms, expected one",
                    roots.len()
                ))
                .into());
            }
        };
        DomainValidator::validate_spec(&tree, root)?;
        Ok(Self {
            tree,
            root,
            dir: dir.into(),
        })
    }

    pub fn projects(&self) -> Vec<NodeId> {
        self.tree.children(self.root).to_vec()
    }

    /// The whole document in brief syntax.
    pub fn encode(&self) -> String {
        self.tree.encode(self.root)
    }
}

/// One section kind available in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionInfo {
    pub kind: String,
    pub variations: Vec<String>,
    pub has_generator: bool,
    pub macros: Vec<String>,
}

/// Main generation service.
pub struct GenerateService {
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn ActionRunner>,
    engines: EngineFactory,
    options: GeneratorOptions,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use brevity_core::application::{GenerateService, GeneratorOptions};
    ///
    /// let service = GenerateService::new(
    ///     Box::new(filesystem), // impl Filesystem
    ///     Box::new(runner),     // impl ActionRunner
    ///     Box::new(|| Box::new(HandlebarsEngine::new()) as Box<dyn TemplateEngine>),
    ///     GeneratorOptions { library: "lib".into(), render_only: false },
    /// );
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn ActionRunner>,
        engines: EngineFactory,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            filesystem,
            runner,
            engines,
            options,
        }
    }

    /// Read a specification file through the filesystem port.
    #[instrument(skip(self))]
    pub fn read_spec(&self, path: &Path) -> BrevityResult<Specification> {
        let path = std::path::absolute(path).map_err(|e| ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let source = self.filesystem.read_to_string(&path)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Specification::parse(&source, dir)
    }

    /// Destination must exist, be a folder, and be owner-writable.
    /// Returns the absolute destination path.
    pub fn validate_destination(&self, destination: &Path) -> BrevityResult<PathBuf> {
        let path = std::path::absolute(destination).map_err(|e| ApplicationError::FilesystemError {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        })?;
        match self.filesystem.inspect(&path)? {
            None => Err(ApplicationError::DestinationNotFound { path }.into()),
            Some(info) if !info.is_dir => Err(ApplicationError::DestinationNotFolder { path }.into()),
            Some(info) if !info.owner_writable => {
                Err(ApplicationError::DestinationNotWritable { path }.into())
            }
            Some(_) => Ok(path),
        }
    }

    fn ensure_library(&self) -> BrevityResult<()> {
        match self.filesystem.inspect(&self.options.library)? {
            Some(info) if info.is_dir => Ok(()),
            _ => Err(ApplicationError::LibraryNotFound {
                path: self.options.library.clone(),
            }
            .into()),
        }
    }

    fn compiler<'a>(&'a self, spec_dir: &'a Path) -> GeneratorCompiler<'a> {
        GeneratorCompiler::new(self.filesystem.as_ref(), &self.options.library, spec_dir)
    }

    /// Every section kind in the library.
    pub fn list_sections(&self) -> BrevityResult<Vec<SectionInfo>> {
        self.ensure_library()?;
        let library = &self.options.library;
        let mut sections = Vec::new();
        for kind in self.filesystem.list_dirs(library)? {
            let dir = library.join(&kind);
            let templates = dir.join(TEMPLATES_DIR);
            let pattern = templates.join(format!("@macro.*.{TEMPLATE_EXTENSION}"));
            let macros = self
                .filesystem
                .glob(&pattern.to_string_lossy())?
                .iter()
                .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            sections.push(SectionInfo {
                variations: self.filesystem.list_dirs(&templates)?,
                has_generator: self.filesystem.exists(&dir.join(GENERATOR_FILE)),
                macros,
                kind,
            });
        }
        Ok(sections)
    }

    /// Expand macros in every project without generating anything.
    /// Returns the total number of expansion rounds.
    #[instrument(skip_all)]
    pub fn expand(&self, spec: &mut Specification) -> BrevityResult<usize> {
        self.ensure_library()?;
        let mut rounds = 0;
        for (position, project) in spec.projects().into_iter().enumerate() {
            DomainValidator::validate_project(spec.tree.get(project), position)?;
            rounds += self.expand_project(spec, project)?;
        }
        Ok(rounds)
    }

    /// Expand macros in one project body.
    pub fn expand_project(&self, spec: &mut Specification, project: NodeId) -> BrevityResult<usize> {
        let compiler = self.compiler(&spec.dir);
        MacroExpander::new(&compiler, self.engines.as_ref()).expand_project(&mut spec.tree, project)
    }

    /// Generate every project of `spec` into `destination`.
    #[instrument(skip_all, fields(destination = %destination.display()))]
    pub fn generate(&self, spec: &mut Specification, destination: &Path) -> BrevityResult<GenerationReport> {
        let destination = self.validate_destination(destination)?;
        self.ensure_library()?;
        let mut report = GenerationReport::default();

        for (position, project) in spec.projects().into_iter().enumerate() {
            DomainValidator::validate_project(spec.tree.get(project), position)?;
            let name = spec.tree.get(project).name.clone();
            let dir = destination.join(&name);
            info!(project = %name, dir = %dir.display(), "--> project");

            self.expand_project(spec, project)?;
            let spec = &*spec;
            let generators = self.prepare_sections(spec, project)?;

            self.filesystem.create_dir_all(&dir)?;
            for (_, generator) in &generators {
                let mut walker = self.walker(generator);
                walker.apply_templates(&spec.tree, project, &dir)?;
                report.steps.extend(walker.into_steps());
            }
            for (section, generator) in &generators {
                let mut walker = self.walker(generator);
                walker.walk(&spec.tree, *section, &dir)?;
                report.steps.extend(walker.into_steps());
            }
            for (_, generator) in &generators {
                let mut walker = self.walker(generator);
                walker.apply_actions(&spec.tree, project, &dir)?;
                report.steps.extend(walker.into_steps());
            }
            report.projects.push(name);
        }

        info!(
            projects = report.projects.len(),
            files = report.files().count(),
            "generation complete"
        );
        Ok(report)
    }

    fn walker<'a>(&'a self, generator: &'a Generator) -> Walker<'a> {
        Walker::new(
            generator,
            self.filesystem.as_ref(),
            self.runner.as_ref(),
            self.options.render_only,
        )
    }

    /// Compile and validate a generator for every section of `project`.
    fn prepare_sections(
        &self,
        spec: &Specification,
        project: NodeId,
    ) -> BrevityResult<Vec<(NodeId, Generator)>> {
        let compiler = self.compiler(&spec.dir);
        let mut generators = Vec::new();
        for section in spec.tree.children(project) {
            let mut generator = compiler.compile(&spec.tree, *section, (self.engines)())?;
            generator.ensure_ready()?;
            generator.validate_section(&spec.tree, *section)?;
            generators.push((*section, generator));
        }
        Ok(generators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BrevityError,
        application::ports::{
            PathInfo,
            output::{MockActionRunner, MockFilesystem, MockTemplateEngine},
        },
    };

    fn service(filesystem: MockFilesystem) -> GenerateService {
        GenerateService::new(
            Box::new(filesystem),
            Box::new(MockActionRunner::new()),
            Box::new(|| Box::new(MockTemplateEngine::new()) as Box<dyn TemplateEngine>),
            GeneratorOptions {
                library: PathBuf::from("/lib"),
                render_only: true,
            },
        )
    }

    #[test]
    fn parse_rejects_multiple_top_level_forms() {
        let err = Specification::parse("brevity\nbrevity\n", "/specs").unwrap_err();
        assert!(matches!(err, BrevityError::Domain(DomainError::InvalidSpec(_))));
    }

    #[test]
    fn parse_rejects_wrong_root() {
        let err = Specification::parse("project:demo\n", "/specs").unwrap_err();
        assert!(err.to_string().contains("top-level element must be 'brevity'"));
    }

    #[test]
    fn parse_keeps_document_folder() {
        let spec = Specification::parse("brevity\n    project:demo\n", "/specs").unwrap();
        assert_eq!(spec.dir, PathBuf::from("/specs"));
        assert_eq!(spec.projects().len(), 1);
    }

    #[test]
    fn destination_checks_map_to_errors() {
        let mut fs = MockFilesystem::new();
        fs.expect_inspect().returning(|path| {
            Ok(match path.to_str() {
                Some("/missing") => None,
                Some("/file") => Some(PathInfo { is_dir: false, owner_writable: true }),
                Some("/locked") => Some(PathInfo { is_dir: true, owner_writable: false }),
                _ => Some(PathInfo { is_dir: true, owner_writable: true }),
            })
        });
        let service = service(fs);

        assert!(matches!(
            service.validate_destination(Path::new("/missing")),
            Err(BrevityError::Application(ApplicationError::DestinationNotFound { .. }))
        ));
        assert!(matches!(
            service.validate_destination(Path::new("/file")),
            Err(BrevityError::Application(ApplicationError::DestinationNotFolder { .. }))
        ));
        assert!(matches!(
            service.validate_destination(Path::new("/locked")),
            Err(BrevityError::Application(ApplicationError::DestinationNotWritable { .. }))
        ));
        assert_eq!(
            service.validate_destination(Path::new("/out")).unwrap(),
            PathBuf::from("/out")
        );
    }

    #[test]
    fn unnamed_project_stops_generation() {
        let mut fs = MockFilesystem::new();
        fs.expect_inspect()
            .returning(|_| Ok(Some(PathInfo { is_dir: true, owner_writable: true })));
        let service = service(fs);

        let mut spec = Specification::parse("brevity\n    project\n", "/specs").unwrap();
        let err = service.generate(&mut spec, Path::new("/out")).unwrap_err();
        assert_eq!(
            err,
            BrevityError::Domain(DomainError::UnnamedProject { position: 0 })
        );
    }

    #[test]
    fn missing_library_is_reported() {
        let mut fs = MockFilesystem::new();
        fs.expect_inspect().returning(|_| Ok(None));
        let service = service(fs);
        assert!(matches!(
            service.list_sections(),
            Err(BrevityError::Application(ApplicationError::LibraryNotFound { .. }))
        ));
    }
}
