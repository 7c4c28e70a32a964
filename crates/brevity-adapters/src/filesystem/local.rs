//! Local filesystem adapter using std::fs.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use brevity_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, PathInfo},
    },
    error::{BrevityError, BrevityResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn inspect(&self, path: &Path) -> BrevityResult<Option<PathInfo>> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io_error(path, e, "inspect")),
        };
        Ok(Some(PathInfo {
            is_dir: metadata.is_dir(),
            owner_writable: owner_writable(&metadata),
        }))
    }

    fn create_dir_all(&self, path: &Path) -> BrevityResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> BrevityResult<()> {
        let mut file = File::create(path).map_err(|e| map_io_error(path, e, "create file"))?;
        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        file.sync_all()
            .map_err(|e| map_io_error(path, e, "sync file"))
    }

    fn read_to_string(&self, path: &Path) -> BrevityResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn list_dirs(&self, path: &Path) -> BrevityResult<Vec<String>> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(map_io_error(path, e, "list directory")),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| map_io_error(&entry.path(), e, "inspect"))?
                .is_dir();
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn glob(&self, pattern: &str) -> BrevityResult<Vec<PathBuf>> {
        let paths = glob::glob(pattern).map_err(|e| ApplicationError::FilesystemError {
            path: PathBuf::from(pattern),
            reason: format!("invalid glob pattern: {e}"),
        })?;
        let mut files = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| map_io_error(&e.path().to_path_buf(), e.into_error(), "glob"))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(unix)]
fn owner_writable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o200 != 0
}

#[cfg(not(unix))]
fn owner_writable(metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BrevityError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_reports_kind_and_absence() {
        let temp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let file = temp.path().join("f.txt");
        fs.write_file(&file, "x").unwrap();

        let dir = fs.inspect(temp.path()).unwrap().unwrap();
        assert!(dir.is_dir);
        assert!(dir.owner_writable);
        assert!(!fs.inspect(&file).unwrap().unwrap().is_dir);
        assert!(fs.inspect(&temp.path().join("nope")).unwrap().is_none());
    }

    #[test]
    fn write_file_truncates() {
        let temp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let file = temp.path().join("f.txt");
        fs.write_file(&file, "long content").unwrap();
        fs.write_file(&file, "short").unwrap();
        assert_eq!(fs.read_to_string(&file).unwrap(), "short");
    }

    #[test]
    fn list_dirs_is_sorted_and_tolerates_missing() {
        let temp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        for name in ["flags", "cobra"] {
            fs.create_dir_all(&temp.path().join(name)).unwrap();
        }
        fs.write_file(&temp.path().join("file.tmpl"), "").unwrap();

        assert_eq!(fs.list_dirs(temp.path()).unwrap(), vec!["cobra", "flags"]);
        assert!(fs.list_dirs(&temp.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn glob_matches_files_only() {
        let temp = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        fs.write_file(&temp.path().join("b.tmpl"), "").unwrap();
        fs.write_file(&temp.path().join("a.tmpl"), "").unwrap();
        fs.write_file(&temp.path().join("c.txt"), "").unwrap();
        fs.create_dir_all(&temp.path().join("d.tmpl")).unwrap();

        let pattern = temp.path().join("*.tmpl");
        let names: Vec<_> = fs
            .glob(&pattern.to_string_lossy())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.tmpl", "b.tmpl"]);
    }
}
