//! `create api`: add a resource's types and/or controller to a project.

use tracing::{debug, info, instrument};

use super::{Scaffold, ScaffoldEntry, ScaffoldReport, Scaffolder};
use crate::{
    domain::{
        DomainValidator, MANIFESTS_PLUGIN_KEY, ProjectConfig, RenderingContext, Resource,
        ToolVersions,
    },
    error::KcpgenResult,
    templates::{
        BOILERPLATE_PATH, Controller, E2eTest, E2eTestUpdater, Group, MainUpdater, SuiteTest,
        SuiteTestUpdater, Types, kcp,
    },
};

/// Scaffolds one resource into an existing project.
///
/// Construction validates the resource and rejects an API the project
/// already records unless `force` is set, so nothing is written for a
/// request that cannot succeed.
#[derive(Debug, Clone)]
pub struct ApiScaffolder {
    config: ProjectConfig,
    resource: Resource,
    force: bool,
    versions: ToolVersions,
}

impl ApiScaffolder {
    pub fn new(config: ProjectConfig, resource: Resource, force: bool) -> KcpgenResult<Self> {
        DomainValidator::validate_config(&config)?;
        let resource = config.complete_resource(resource);
        DomainValidator::validate_new_api(&config, &resource, force)?;

        Ok(Self {
            config,
            resource,
            force,
            versions: ToolVersions::default(),
        })
    }

    pub fn with_tool_versions(mut self, versions: ToolVersions) -> Self {
        self.versions = versions;
        self
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// The project config with this resource recorded, for the caller to persist.
    pub fn updated_config(&self) -> ProjectConfig {
        let mut config = self.config.clone();
        config.update_resource(&self.resource);
        config
    }

    fn entries(&self) -> Vec<ScaffoldEntry> {
        let multigroup = self.config.multigroup;
        let mut entries = Vec::new();

        if self.resource.has_api() {
            entries.push(
                ScaffoldEntry::create(Types::new(multigroup, self.resource.namespaced))
                    .forced(self.force),
            );
            entries.push(ScaffoldEntry::create(Group::new(multigroup)));
        }

        if self.resource.has_controller() {
            entries.extend([
                ScaffoldEntry::create(SuiteTest::new(multigroup, self.resource.has_api())),
                ScaffoldEntry::update(SuiteTestUpdater::new(multigroup)),
                ScaffoldEntry::create(Controller::new(
                    multigroup,
                    self.versions.controller_runtime.as_str(),
                ))
                .forced(self.force),
                ScaffoldEntry::create(E2eTest::new(multigroup)),
                ScaffoldEntry::update(E2eTestUpdater::new(multigroup)),
            ]);
        }

        entries.push(ScaffoldEntry::update(MainUpdater::new(
            self.resource.has_api(),
            self.resource.has_controller(),
        )));

        if self.config.has_plugin(MANIFESTS_PLUGIN_KEY) && !self.resource.is_empty_gvk() {
            entries.push(ScaffoldEntry::create(kcp::ApiExport));
            entries.push(ScaffoldEntry::create(kcp::PatchApiExport));
        }

        entries
    }
}

impl Scaffolder for ApiScaffolder {
    #[instrument(skip_all, fields(resource = %self.resource, force = self.force))]
    fn scaffold(&self, scaffold: &Scaffold) -> KcpgenResult<ScaffoldReport> {
        let boilerplate = scaffold.load_boilerplate(BOILERPLATE_PATH)?;
        let ctx = RenderingContext::from_config(&self.config)
            .with_boilerplate(boilerplate)
            .with_resource(self.resource.clone());

        let entries = self.entries();
        debug!(
            api = self.resource.has_api(),
            controller = self.resource.has_controller(),
            entries = entries.len(),
            "Create API plan"
        );

        let report = scaffold.execute(&ctx, entries)?;
        info!(files = report.len(), "API scaffolded");
        Ok(report)
    }
}
