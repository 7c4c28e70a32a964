//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use brevity_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, PathInfo},
    },
    error::{BrevityError, BrevityResult},
};
use glob::{MatchOptions, Pattern};

/// In-memory filesystem for testing.
///
/// Clones share the same contents, so a test can keep a handle after
/// boxing one into a service.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn insert_dirs(&mut self, path: &Path) -> BrevityResult<()> {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if self.directories.contains(&current) {
                continue;
            }
            if let Some(parent) = current.parent() {
                if self.read_only.contains(parent) {
                    return Err(denied(&current));
                }
            }
            self.directories.insert(current.clone());
        }
        Ok(())
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    fn read(&self) -> BrevityResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> BrevityResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) -> BrevityResult<()> {
        let path = path.as_ref();
        let mut inner = self.write()?;
        if let Some(parent) = path.parent() {
            inner.insert_dirs(parent)?;
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    /// Remove owner write permission from a directory (testing helper).
    pub fn set_read_only(&self, path: impl AsRef<Path>) -> BrevityResult<()> {
        let path = path.as_ref();
        let mut inner = self.write()?;
        inner.insert_dirs(path)?;
        inner.read_only.insert(path.to_path_buf());
        Ok(())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn inspect(&self, path: &Path) -> BrevityResult<Option<PathInfo>> {
        let inner = self.read()?;
        if inner.directories.contains(path) {
            return Ok(Some(PathInfo {
                is_dir: true,
                owner_writable: !inner.read_only.contains(path),
            }));
        }
        if inner.files.contains_key(path) {
            return Ok(Some(PathInfo {
                is_dir: false,
                owner_writable: true,
            }));
        }
        Ok(None)
    }

    fn create_dir_all(&self, path: &Path) -> BrevityResult<()> {
        self.write()?.insert_dirs(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> BrevityResult<()> {
        let mut inner = self.write()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
            if inner.read_only.contains(parent) {
                return Err(denied(path));
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> BrevityResult<String> {
        self.read()?.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn list_dirs(&self, path: &Path) -> BrevityResult<Vec<String>> {
        let inner = self.read()?;
        Ok(inner
            .directories
            .iter()
            .filter(|dir| dir.parent() == Some(path))
            .filter_map(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn glob(&self, pattern: &str) -> BrevityResult<Vec<PathBuf>> {
        let compiled = Pattern::new(pattern).map_err(|e| ApplicationError::FilesystemError {
            path: PathBuf::from(pattern),
            reason: format!("invalid glob pattern: {e}"),
        })?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };
        let inner = self.read()?;
        Ok(inner
            .files
            .keys()
            .filter(|path| compiled.matches_path_with(path, options))
            .cloned()
            .collect())
    }
}

fn poisoned() -> BrevityError {
    BrevityError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn denied(path: &Path) -> BrevityError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "Permission denied".into(),
    }
    .into()
}
