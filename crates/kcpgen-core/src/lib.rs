//! kcpgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for scaffolding
//! kcp-aware controller projects, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            kcpgen-cli (CLI)             │
//! │   init / create api, PROJECT file I/O   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │  InitScaffolder, ApiScaffolder, Scaffold│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │      Filesystem, TemplateRenderer       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     kcpgen-adapters (Infrastructure)    │
//! │ LocalFilesystem, MemoryFilesystem, Tera │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The domain layer (context, templates, markers, resources) and the
//! built-in template catalogue do no I/O.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kcpgen_core::prelude::*;
//!
//! let config = ProjectConfig::new("widgets", "example.com", "widgets");
//! let scaffold = Scaffold::new("./widgets", filesystem, renderer);
//!
//! InitScaffolder::new(config.clone()).scaffold(&scaffold)?;
//!
//! let widget = Resource::new("apps", "v1", "Widget")
//!     .with_api(true)
//!     .with_controller(true);
//! let api = ApiScaffolder::new(config, widget, false)?;
//! api.scaffold(&scaffold)?.into_result()?;
//! let config = api.updated_config();
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod templates;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApiScaffolder, FileStatus, InitScaffolder, Scaffold, ScaffoldOptions, ScaffoldReport,
        Scaffolder,
        ports::{Filesystem, TemplateRenderer},
    };
    pub use crate::domain::{
        FragmentPolicy, License, ProjectConfig, RenderingContext, Resource, ToolVersions,
    };
    pub use crate::error::{KcpgenError, KcpgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
