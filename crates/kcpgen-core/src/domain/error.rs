// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep copies of per-file failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors (fatal for a whole run)
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid project configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("API resource {gvk} already exists")]
    ResourceExists { gvk: String },

    // ========================================================================
    // Path Resolution Errors (fatal for a whole run)
    // ========================================================================
    #[error("Cannot resolve '{placeholder}' in path '{path}': {reason}")]
    UnresolvedPlaceholder {
        path: String,
        placeholder: String,
        reason: &'static str,
    },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("The '{}' value must be set before scaffolding", field),
                "Check the PROJECT file or pass the value as a flag".into(),
            ],
            Self::InvalidConfig(msg) => vec![
                "Check your project configuration".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidResource(msg) => vec![
                format!("Details: {}", msg),
                "Versions look like v1, v1alpha1 or v2beta3".into(),
                "Kinds are PascalCase, e.g. Widget or CronJob".into(),
            ],
            Self::ResourceExists { gvk } => vec![
                format!("{} is already recorded in the PROJECT file", gvk),
                "Use --force to scaffold it again (overwrites types and controller)".into(),
            ],
            Self::UnresolvedPlaceholder { placeholder, .. } => vec![
                format!("'{}' could not be substituted", placeholder),
                "Known placeholders: %[group], %[version], %[kind], %[plural]".into(),
            ],
            Self::AbsolutePathNotAllowed { path } => vec![
                format!("'{}' must be relative to the project root", path),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredField { .. } | Self::InvalidConfig(_) => {
                ErrorCategory::Configuration
            }
            Self::InvalidResource(_) => ErrorCategory::Validation,
            Self::ResourceExists { .. } => ErrorCategory::Conflict,
            Self::UnresolvedPlaceholder { .. } | Self::AbsolutePathNotAllowed { .. } => {
                ErrorCategory::PathResolution
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Conflict,
    PathResolution,
}
