//! Application layer errors.
//!
//! These errors represent failures while dispatching files, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.
//!
//! Every variant that concerns a single file carries its path so the
//! orchestrator can report it without extra bookkeeping.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during scaffold orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Template expansion failed.
    #[error("Failed to render {path}: {reason}")]
    RenderingFailed { path: PathBuf, reason: String },

    /// An error-if-exists template found its file already present.
    #[error("{path} already exists")]
    FileExists { path: PathBuf },

    /// An updater targets a marker whose sentinel is absent from the file.
    #[error("Marker '{marker}' not found in {path}")]
    MarkerNotFound { path: PathBuf, marker: String },

    /// An updater was dispatched against a file that does not exist.
    #[error("Cannot update {path}: file does not exist")]
    UpdateTargetMissing { path: PathBuf },

    /// The boilerplate header could not be loaded.
    #[error("Unable to load boilerplate from {path}: {reason}")]
    BoilerplateMissing { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// One or more files failed during a lenient run.
    #[error("{} file(s) failed to scaffold", failures.len())]
    ScaffoldIncomplete { failures: Vec<ApplicationError> },
}

impl ApplicationError {
    /// The file this error is attributed to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RenderingFailed { path, .. }
            | Self::FileExists { path }
            | Self::MarkerNotFound { path, .. }
            | Self::UpdateTargetMissing { path }
            | Self::BoilerplateMissing { path, .. }
            | Self::FilesystemError { path, .. } => Some(path),
            Self::ScaffoldIncomplete { .. } => None,
        }
    }

    /// The marker label involved, for marker failures.
    pub fn marker(&self) -> Option<&str> {
        match self {
            Self::MarkerNotFound { marker, .. } => Some(marker),
            _ => None,
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RenderingFailed { path, reason } => vec![
                format!("Template for {} could not be expanded", path.display()),
                format!("Renderer said: {}", reason),
                "This usually means a required value is empty".into(),
            ],
            Self::FileExists { path } => vec![
                format!("{} was created by an earlier run", path.display()),
                "Use --force to overwrite it (destructive)".into(),
            ],
            Self::MarkerNotFound { path, marker } => vec![
                format!(
                    "Restore the '+kubebuilder:scaffold:{}' comment in {}",
                    marker,
                    path.display()
                ),
                "Markers are required for incremental updates; do not delete them".into(),
            ],
            Self::UpdateTargetMissing { path } => vec![
                format!("{} is expected to exist already", path.display()),
                "Run 'kcpgen init' first".into(),
            ],
            Self::BoilerplateMissing { path, .. } => vec![
                format!("Expected a license header at {}", path.display()),
                "Run 'kcpgen init' first, or restore the file".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ScaffoldIncomplete { failures } => {
                let mut out: Vec<String> = failures.iter().map(|f| format!("  • {}", f)).collect();
                out.insert(0, "The following files failed:".into());
                out
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RenderingFailed { .. } => ErrorCategory::Rendering,
            Self::FileExists { .. } => ErrorCategory::Conflict,
            Self::MarkerNotFound { .. } => ErrorCategory::MarkerNotFound,
            Self::UpdateTargetMissing { .. } | Self::BoilerplateMissing { .. } => {
                ErrorCategory::NotFound
            }
            Self::FilesystemError { .. } => ErrorCategory::Io,
            Self::ScaffoldIncomplete { failures } => failures
                .first()
                .map(ApplicationError::category)
                .unwrap_or(ErrorCategory::Internal),
        }
    }
}
