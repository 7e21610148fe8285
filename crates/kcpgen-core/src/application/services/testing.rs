//! In-memory doubles shared by the service tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::{
    ApplicationError,
    ports::{Filesystem, TemplateRenderer},
};
use crate::domain::{Locals, RenderingContext};

/// Project root every fake path hangs off.
pub(crate) const ROOT: &str = "/p";

#[derive(Default)]
pub(crate) struct FakeFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    modes: Mutex<BTreeMap<PathBuf, u32>>,
    writes: Mutex<usize>,
}

impl FakeFs {
    fn abs(path: &str) -> PathBuf {
        PathBuf::from(ROOT).join(path)
    }

    pub(crate) fn seed(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(Self::abs(path), content.to_string());
    }

    pub(crate) fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(&Self::abs(path)).cloned()
    }

    pub(crate) fn mode(&self, path: &str) -> Option<u32> {
        self.modes.lock().unwrap().get(&Self::abs(path)).copied()
    }

    pub(crate) fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl Filesystem for Arc<FakeFs> {
    fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), ApplicationError> {
        self.modes.lock().unwrap().insert(path.to_path_buf(), mode);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str, mode: u32) -> Result<(), ApplicationError> {
        *self.writes.lock().unwrap() += 1;
        self.modes.lock().unwrap().insert(path.to_path_buf(), mode);
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, ApplicationError> {
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

/// Writes template bodies out untouched, sentinels included.
pub(crate) struct RawRenderer;

impl TemplateRenderer for RawRenderer {
    fn render(
        &self,
        _path: &Path,
        body: &str,
        _ctx: &RenderingContext,
        _locals: &Locals,
    ) -> Result<String, ApplicationError> {
        Ok(body.to_string())
    }
}
