//! Core domain layer for kcpgen.
//!
//! Pure values and rules: project configuration, resources, the rendering
//! context, templates, markers and the splice that weaves fragments into
//! existing content. No I/O happens here; the application layer reaches the
//! outside world through ports.

pub mod entities;
pub mod error;
pub mod value_objects;

mod validation;

pub use entities::{
    common::RelativePath,
    context::{ContextField, RenderingContext, ResourceContext, hash_fnv},
    marker::{
        CommentStyle, FragmentMap, FragmentPolicy, Marker, MarkerLabel, Spliced, find_missing,
        fragment_present, splice,
    },
    project::ProjectConfig,
    resource::{Resource, pluralize},
    template::{IfExistsAction, LocalValue, Locals, PathPattern, Template, Updater, locals},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{
    GO_PLUGIN_KEY, KUSTOMIZE_V1_PLUGIN_KEY, KUSTOMIZE_V2_ALPHA_PLUGIN_KEY, KustomizeVersion,
    License, MANIFESTS_PLUGIN_KEY, ToolVersions, default_plugin_chain,
};

pub use validation::DomainValidator;
