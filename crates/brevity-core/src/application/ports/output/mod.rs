//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what generation needs from external systems.
//! The `brevity-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::BrevityResult;

/// What the filesystem knows about an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathInfo {
    pub is_dir: bool,
    /// Owner write permission bit is set.
    pub owner_writable: bool,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `brevity_adapters::filesystem::LocalFilesystem` (production)
/// - `brevity_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// `None` when nothing exists at `path`.
    fn inspect(&self, path: &Path) -> BrevityResult<Option<PathInfo>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BrevityResult<()>;

    /// Create or truncate `path`, write `content` and flush it to storage.
    fn write_file(&self, path: &Path, content: &str) -> BrevityResult<()>;

    fn read_to_string(&self, path: &Path) -> BrevityResult<String>;

    /// Names of the subdirectories of `path`, sorted. A missing directory
    /// has none.
    fn list_dirs(&self, path: &Path) -> BrevityResult<Vec<String>>;

    /// Files matching a glob pattern, sorted.
    fn glob(&self, pattern: &str) -> BrevityResult<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool {
        matches!(self.inspect(path), Ok(Some(_)))
    }
}

/// Port for named template compilation and execution.
///
/// One engine instance backs one generator, so names from different
/// sections never collide.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateEngine: Send + Sync {
    /// Compile `source` under `name`, replacing any earlier template.
    fn register(&mut self, name: &str, source: &str) -> BrevityResult<()>;

    fn has_template(&self, name: &str) -> bool;

    /// Registered names, sorted.
    fn template_names(&self) -> Vec<String>;

    fn render(&self, name: &str, data: &Value) -> BrevityResult<String>;

    /// Compile and execute a one-off template.
    fn render_str(&self, source: &str, data: &Value) -> BrevityResult<String>;
}

/// Result of running an external program to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutput {
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Standard output followed by standard error.
    pub output: String,
}

/// Port for executing external programs directly (no shell).
#[cfg_attr(test, mockall::automock)]
pub trait ActionRunner: Send + Sync {
    /// Run `program` with `args` in `dir` and wait for it.
    ///
    /// Errors only when the program cannot be started; an unsuccessful
    /// exit is reported through [`ActionOutput::success`].
    fn run(&self, program: &str, args: &[String], dir: &Path) -> BrevityResult<ActionOutput>;
}
