//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use kcpgen_core::application::{ApplicationError, ports::Filesystem};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can hand one clone to the
/// orchestrator and inspect the result through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashMap<PathBuf, u32>,
    modes: HashMap<PathBuf, u32>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file in place without going through the port.
    pub fn seed(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        if let Ok(mut inner) = self.inner.write() {
            inner
                .files
                .insert(path.as_ref().to_path_buf(), content.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Mode a file or directory was created with.
    pub fn mode(&self, path: impl AsRef<Path>) -> Option<u32> {
        let inner = self.inner.read().ok()?;
        let path = path.as_ref();
        inner
            .modes
            .get(path)
            .or_else(|| inner.directories.get(path))
            .copied()
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.modes.clear();
        }
    }

    fn read_inner(&self, path: &Path) -> Result<RwLockReadGuard<'_, MemoryFilesystemInner>, ApplicationError> {
        self.inner.read().map_err(|_| poisoned(path))
    }

    fn write_inner(
        &self,
        path: &Path,
    ) -> Result<RwLockWriteGuard<'_, MemoryFilesystemInner>, ApplicationError> {
        self.inner.write().map_err(|_| poisoned(path))
    }
}

fn poisoned(path: &Path) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "memory filesystem lock poisoned".into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), ApplicationError> {
        let mut inner = self.write_inner(path)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.entry(current.clone()).or_insert(mode);
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str, mode: u32) -> Result<(), ApplicationError> {
        let mut inner = self.write_inner(path)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains_key(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                });
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.modes.insert(path.to_path_buf(), mode);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, ApplicationError> {
        let inner = self.read_inner(path)?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains_key(path))
            .unwrap_or(false)
    }
}
