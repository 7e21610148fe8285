//! Application layer for kcpgen.
//!
//! This layer contains:
//! - **Services**: the scaffold orchestrator and the init / create-api scaffolders
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer and the template
//! catalogue. Rules about resources and configuration live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ApiScaffolder, FileOutcome, FileStatus, InitScaffolder, Scaffold, ScaffoldEntry,
    ScaffoldOptions, ScaffoldReport, ScaffoldSummary, Scaffolder,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TemplateRenderer};

pub use error::ApplicationError;
