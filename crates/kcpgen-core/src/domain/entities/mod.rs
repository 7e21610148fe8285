pub mod common;
pub mod context;
pub mod marker;
pub mod project;
pub mod resource;
pub mod template;

pub use crate::domain::DomainError;
pub use context::{ContextField, RenderingContext, ResourceContext};
pub use marker::{FragmentMap, FragmentPolicy, Marker, MarkerLabel};
pub use project::ProjectConfig;
pub use resource::Resource;
pub use template::{IfExistsAction, PathPattern, Template, Updater};
