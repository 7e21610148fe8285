//! Unified error handling for kcpgen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for kcpgen core operations.
///
/// This enum wraps all possible errors that can occur when using kcpgen-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KcpgenError {
    /// Errors from the domain layer (configuration, resources, paths).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (per-file dispatch failures).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl KcpgenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in kcpgen".into(),
                "Please report this issue at: https://github.com/cosecruz/kcpgen/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::Conflict => ErrorCategory::Conflict,
                crate::domain::ErrorCategory::PathResolution => ErrorCategory::PathResolution,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this error aborts a whole scaffold run rather than one file.
    ///
    /// Configuration and path resolution problems are detected before any
    /// write; everything else is scoped to the file that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Configuration | ErrorCategory::PathResolution | ErrorCategory::Internal
        ) || matches!(
            self,
            Self::Application(ApplicationError::BoilerplateMissing { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    PathResolution,
    Rendering,
    Conflict,
    MarkerNotFound,
    NotFound,
    Io,
    Internal,
}

/// Convenient result type alias.
pub type KcpgenResult<T> = Result<T, KcpgenError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn configuration_and_path_errors_are_fatal() {
        let missing: KcpgenError = DomainError::MissingRequiredField { field: "domain" }.into();
        assert!(missing.is_fatal());

        let unresolved: KcpgenError = DomainError::UnresolvedPlaceholder {
            path: "api/%[bogus]/x.go".into(),
            placeholder: "%[bogus]".into(),
            reason: "unknown placeholder",
        }
        .into();
        assert!(unresolved.is_fatal());
    }

    #[test]
    fn per_file_errors_are_not_fatal() {
        let conflict: KcpgenError = ApplicationError::FileExists {
            path: PathBuf::from("go.mod"),
        }
        .into();
        assert!(!conflict.is_fatal());
        assert_eq!(conflict.category(), ErrorCategory::Conflict);

        let marker: KcpgenError = ApplicationError::MarkerNotFound {
            path: PathBuf::from("main.go"),
            marker: "imports".into(),
        }
        .into();
        assert!(!marker.is_fatal());
        assert_eq!(marker.category(), ErrorCategory::MarkerNotFound);
    }

    #[test]
    fn incomplete_run_lists_every_failure() {
        let err = ApplicationError::ScaffoldIncomplete {
            failures: vec![
                ApplicationError::FileExists {
                    path: PathBuf::from("go.mod"),
                },
                ApplicationError::MarkerNotFound {
                    path: PathBuf::from("main.go"),
                    marker: "builder".into(),
                },
            ],
        };
        assert_eq!(err.to_string(), "2 file(s) failed to scaffold");
        let suggestions = err.suggestions();
        assert!(suggestions.iter().any(|s| s.contains("go.mod")));
        assert!(suggestions.iter().any(|s| s.contains("builder")));
    }
}
