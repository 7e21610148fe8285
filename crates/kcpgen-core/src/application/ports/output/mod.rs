//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kcpgen-adapters` crate provides implementations.

use std::path::Path;

use crate::application::ApplicationError;
use crate::domain::{Locals, RenderingContext};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kcpgen_adapters::filesystem::LocalFilesystem` (production)
/// - `kcpgen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths handed to the port are already joined onto the scaffold root.
/// `write_file` must be all-or-nothing: either the full content lands or the
/// previous bytes stay.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories with `mode`.
    fn create_dir_all(&self, path: &Path, mode: u32) -> Result<(), ApplicationError>;

    /// Replace the file at `path` with `content`, applying `mode`.
    fn write_file(&self, path: &Path, content: &str, mode: u32) -> Result<(), ApplicationError>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, ApplicationError>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `kcpgen_adapters::renderer::TeraRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Expand `body` against the shared context plus template `locals`.
    ///
    /// `path` is the resolved output path, used for error attribution.
    fn render(
        &self,
        path: &Path,
        body: &str,
        context: &RenderingContext,
        locals: &Locals,
    ) -> Result<String, ApplicationError>;
}
