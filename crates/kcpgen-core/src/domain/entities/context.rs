//! Rendering context: the values every template body and path can see.
//!
//! The context is built once by a scaffolder and frozen before it reaches the
//! orchestrator. Builders consume `self`, so there is no way to change it
//! mid-run.

use serde::Serialize;

use crate::domain::{DomainError, ProjectConfig, Resource};

/// Fields a template may declare as mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextField {
    ProjectName,
    Domain,
    Repo,
    Boilerplate,
    Resource,
}

impl ContextField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectName => "project_name",
            Self::Domain => "domain",
            Self::Repo => "repo",
            Self::Boilerplate => "boilerplate",
            Self::Resource => "resource",
        }
    }
}

/// Flattened resource values exposed to template bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContext {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub domain: String,
    pub qualified_group: String,
    pub package_name: String,
    pub import_alias: String,
    /// Go import path of the API package; empty when there is none.
    pub path: String,
}

impl From<&Resource> for ResourceContext {
    fn from(r: &Resource) -> Self {
        Self {
            group: r.group.clone(),
            version: r.version.clone(),
            kind: r.kind.clone(),
            plural: r.plural(),
            domain: r.domain.clone(),
            qualified_group: r.qualified_group(),
            package_name: r.package_name(),
            import_alias: r.import_alias(),
            path: r.path.clone().unwrap_or_default(),
        }
    }
}

/// Immutable bag of values used to resolve paths and render bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderingContext {
    project_name: String,
    domain: String,
    repo: String,
    multigroup: bool,
    component_config: bool,
    boilerplate: Option<String>,
    resource: Option<ResourceContext>,
    #[serde(skip)]
    source_resource: Option<Resource>,
}

impl RenderingContext {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            project_name: config.project_name.clone(),
            domain: config.domain.clone(),
            repo: config.repo.clone(),
            multigroup: config.multigroup,
            component_config: config.component_config,
            boilerplate: None,
            resource: None,
            source_resource: None,
        }
    }

    pub fn with_boilerplate(mut self, boilerplate: impl Into<String>) -> Self {
        self.boilerplate = Some(boilerplate.into());
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(ResourceContext::from(&resource));
        self.source_resource = Some(resource);
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn multigroup(&self) -> bool {
        self.multigroup
    }

    pub fn component_config(&self) -> bool {
        self.component_config
    }

    pub fn boilerplate(&self) -> Option<&str> {
        self.boilerplate.as_deref()
    }

    pub fn resource(&self) -> Option<&Resource> {
        self.source_resource.as_ref()
    }

    /// True when the layout nests per-group directories and the resource has a group.
    pub fn grouped_layout(&self) -> bool {
        self.multigroup && self.resource().is_some_and(|r| !r.group.is_empty())
    }

    /// Check that a field is present and non-empty.
    pub fn require(&self, field: ContextField) -> Result<(), DomainError> {
        let present = match field {
            ContextField::ProjectName => !self.project_name.is_empty(),
            ContextField::Domain => !self.domain.is_empty(),
            ContextField::Repo => !self.repo.is_empty(),
            ContextField::Boilerplate => self.boilerplate.is_some(),
            ContextField::Resource => self.source_resource.is_some(),
        };
        if present {
            Ok(())
        } else {
            Err(DomainError::MissingRequiredField {
                field: field.as_str(),
            })
        }
    }

    /// Check every field in `fields`, failing on the first missing one.
    pub fn require_all(&self, fields: &[ContextField]) -> Result<(), DomainError> {
        fields.iter().try_for_each(|f| self.require(*f))
    }
}

/// 32-bit FNV-1a hash of `text` as lower-case hex.
///
/// Used for stable identifiers such as the leader election ID.
pub fn hash_fnv(text: &str) -> String {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;

    let hash = text.bytes().fold(OFFSET_BASIS, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(PRIME)
    });
    format!("{hash:x}")
}
