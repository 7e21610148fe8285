//! Project configuration, the in-memory form of the PROJECT file.

use std::ops::Not;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Resource, value_objects};

fn default_version() -> String {
    "3".to_string()
}

/// Project-wide settings plus the resources scaffolded so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub domain: String,
    /// Plugin chain used to scaffold the project.
    #[serde(default)]
    pub layout: Vec<String>,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub multigroup: bool,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub component_config: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(default = "default_version")]
    pub version: String,
}

impl ProjectConfig {
    pub fn new(
        project_name: impl Into<String>,
        domain: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            layout: value_objects::default_plugin_chain(),
            project_name: project_name.into(),
            repo: repo.into(),
            multigroup: false,
            component_config: false,
            resources: Vec::new(),
            version: default_version(),
        }
    }

    pub fn with_multigroup(mut self, multigroup: bool) -> Self {
        self.multigroup = multigroup;
        self
    }

    pub fn with_component_config(mut self, component_config: bool) -> Self {
        self.component_config = component_config;
        self
    }

    pub fn with_plugin_chain(mut self, chain: Vec<String>) -> Self {
        self.layout = chain;
        self
    }

    pub fn plugin_chain(&self) -> &[String] {
        &self.layout
    }

    pub fn has_plugin(&self, key: &str) -> bool {
        self.layout.iter().any(|k| k == key)
    }

    /// Recorded resource with the same GVK, if any.
    pub fn resource(&self, gvk: &Resource) -> Option<&Resource> {
        self.resources.iter().find(|r| r.same_gvk(gvk))
    }

    /// Whether an API for this GVK was already scaffolded.
    pub fn has_api_for(&self, gvk: &Resource) -> bool {
        self.resource(gvk).is_some_and(Resource::has_api)
    }

    /// Record a resource, merging flags into an existing record.
    pub fn update_resource(&mut self, resource: &Resource) {
        match self.resources.iter_mut().find(|r| r.same_gvk(resource)) {
            Some(existing) => existing.merge(resource),
            None => self.resources.push(resource.clone()),
        }
    }

    /// Go import path of the package holding the resource's API types.
    pub fn api_package_path(&self, resource: &Resource) -> String {
        if self.multigroup {
            if resource.group.is_empty() {
                format!("{}/apis/{}", self.repo, resource.version)
            } else {
                format!("{}/apis/{}/{}", self.repo, resource.group, resource.version)
            }
        } else {
            format!("{}/api/{}", self.repo, resource.version)
        }
    }

    /// Fill in what the resource leaves to the project: domain and API package.
    pub fn complete_resource(&self, mut resource: Resource) -> Resource {
        if resource.domain.is_empty() {
            resource.domain = self.domain.clone();
        }
        if resource.has_api() && resource.path.is_none() {
            resource.path = Some(self.api_package_path(&resource));
        }
        resource
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.project_name.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "project_name",
            });
        }
        if self.domain.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "domain" });
        }
        if self.repo.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "repo" });
        }
        if !is_dns_label(&self.project_name) {
            return Err(DomainError::InvalidConfig(format!(
                "project name '{}' must be a lowercase DNS-1123 label",
                self.project_name
            )));
        }
        Ok(())
    }
}

fn is_dns_label(s: &str) -> bool {
    s.len() <= 63
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !s.starts_with('-')
        && !s.ends_with('-')
}
