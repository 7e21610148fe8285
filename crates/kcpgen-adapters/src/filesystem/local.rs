//! Local filesystem adapter using std::fs.
//!
//! Writes go through a temporary file in the target directory that is
//! renamed over the destination, so a file is either fully old or fully new.

use std::io::{self, Write};
use std::path::Path;

use kcpgen_core::application::{ApplicationError, ports::Filesystem};
use tempfile::NamedTempFile;
use tracing::debug;

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
    fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), ApplicationError> {
        if path.is_dir() {
            return Ok(());
        }
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder
            .create(path)
            .map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str, mode: u32) -> Result<(), ApplicationError> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut staged =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "stage file"))?;
        staged
            .write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write file"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(mode))
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        staged
            .persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, ApplicationError> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let target = dir.path().join("hack/boilerplate.go.txt");

        fs.create_dir_all(target.parent().unwrap(), 0o755).unwrap();
        fs.write_file(&target, "/* header */", 0o644).unwrap();

        assert!(fs.exists(&target));
        assert_eq!(fs.read_to_string(&target).unwrap(), "/* header */");
    }

    #[test]
    fn overwrite_replaces_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let target = dir.path().join("go.mod");

        fs.write_file(&target, "module a\nlonger tail\n", 0o644).unwrap();
        fs.write_file(&target, "module b\n", 0o644).unwrap();

        assert_eq!(fs.read_to_string(&target).unwrap(), "module b\n");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn applies_requested_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let target = dir.path().join("main.go");
        fs.write_file(&target, "package main\n", 0o600).unwrap();

        let mode = std::fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn reading_missing_file_is_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&dir.path().join("nope.go"))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::FilesystemError { .. }));
    }
}
