//! `init`: lay down a fresh project.

use chrono::Datelike;
use tracing::{info, instrument};

use super::{Scaffold, ScaffoldEntry, ScaffoldReport, Scaffolder};
use crate::{
    domain::{
        DomainValidator, KustomizeVersion, License, MANIFESTS_PLUGIN_KEY, ProjectConfig,
        RenderingContext, ToolVersions,
    },
    error::KcpgenResult,
    templates::{
        ApiBinding, AuditPolicy, BOILERPLATE_PATH, Boilerplate, DockerIgnore, Dockerfile,
        GitIgnore, GoMod, Main, Makefile, Readme, kcp,
    },
};

/// Scaffolds the initial file set of a project.
///
/// The boilerplate is written first and read back, so every later template
/// renders with the header exactly as it sits on disk.
#[derive(Debug, Clone)]
pub struct InitScaffolder {
    config: ProjectConfig,
    license: License,
    owner: String,
    year: String,
    force: bool,
    versions: ToolVersions,
}

impl InitScaffolder {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            license: License::default(),
            owner: String::new(),
            year: chrono::Local::now().year().to_string(),
            force: false,
            versions: ToolVersions::default(),
        }
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = license;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    /// Overwrite files that would otherwise stop the run.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_tool_versions(mut self, versions: ToolVersions) -> Self {
        self.versions = versions;
        self
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    fn project_entries(&self, boilerplate: &str) -> Vec<ScaffoldEntry> {
        let kustomize = KustomizeVersion::for_plugin_chain(self.config.plugin_chain());

        let mut entries = vec![
            ScaffoldEntry::create(Main),
            ScaffoldEntry::create(GoMod::new(&self.versions)),
            ScaffoldEntry::create(GitIgnore),
            ScaffoldEntry::create(Makefile::new(&self.versions, kustomize, BOILERPLATE_PATH)),
            ScaffoldEntry::create(Dockerfile),
            ScaffoldEntry::create(DockerIgnore),
            ScaffoldEntry::create(Readme::new(boilerplate)),
            ScaffoldEntry::create(ApiBinding),
            ScaffoldEntry::create(AuditPolicy),
        ];

        if self.config.has_plugin(MANIFESTS_PLUGIN_KEY) {
            entries.extend([
                ScaffoldEntry::create(kcp::Kustomization),
                ScaffoldEntry::create(kcp::ClusterRole),
                ScaffoldEntry::create(kcp::ClusterRoleBinding),
                ScaffoldEntry::create(kcp::ApiResourceSchemas),
                ScaffoldEntry::create(kcp::DefaultKustomization),
                ScaffoldEntry::create(kcp::DefaultKustomizeConfig),
                ScaffoldEntry::create(kcp::ManagerPatch),
            ]);
        }

        entries
            .into_iter()
            .map(|e| e.forced(self.force))
            .collect()
    }
}

impl Scaffolder for InitScaffolder {
    #[instrument(skip_all, fields(project = %self.config.project_name, repo = %self.config.repo))]
    fn scaffold(&self, scaffold: &Scaffold) -> KcpgenResult<ScaffoldReport> {
        DomainValidator::validate_config(&self.config)?;

        let base = RenderingContext::from_config(&self.config);
        let header = Boilerplate::new(self.license, self.owner.as_str(), self.year.as_str());
        let mut report = scaffold.execute(
            &base,
            vec![ScaffoldEntry::create(header).forced(self.force)],
        )?;

        let boilerplate = scaffold.load_boilerplate(BOILERPLATE_PATH)?;
        let ctx = base.with_boilerplate(boilerplate.as_str());
        report.merge(scaffold.execute(&ctx, self.project_entries(&boilerplate))?);

        info!(files = report.len(), "Project initialised");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::services::testing::{FakeFs, RawRenderer, ROOT};
    use crate::application::services::FileStatus;
    use crate::domain::{DomainError, GO_PLUGIN_KEY, KUSTOMIZE_V2_ALPHA_PLUGIN_KEY};
    use crate::error::KcpgenError;

    fn scaffold(fs: &Arc<FakeFs>) -> Scaffold {
        Scaffold::new(ROOT, Box::new(Arc::clone(fs)), Box::new(RawRenderer))
    }

    fn config() -> ProjectConfig {
        ProjectConfig::new("widgets", "example.com", "widgets")
    }

    #[test]
    fn writes_boilerplate_then_project_files() {
        let fs = Arc::new(FakeFs::default());
        let report = InitScaffolder::new(config())
            .with_year("2026")
            .scaffold(&scaffold(&fs))
            .unwrap();

        assert_eq!(report.outcomes()[0].path.to_string(), BOILERPLATE_PATH);
        for path in [
            "main.go",
            "go.mod",
            ".gitignore",
            "Makefile",
            "Dockerfile",
            ".dockerignore",
            "README.md",
            "test/e2e/apibinding.yaml",
            "test/e2e/audit-policy.yaml",
            "config/kcp/kustomization.yaml",
            "config/default-kcp/manager_patch.yaml",
        ] {
            assert_eq!(
                report.outcome(path).map(|o| &o.status),
                Some(&FileStatus::Created),
                "{path}"
            );
        }
        assert!(!report.has_failures());
        assert!(fs.get("main.go").unwrap().contains("// +kubebuilder:scaffold:builder"));
    }

    #[test]
    fn kcp_overlay_requires_manifests_plugin() {
        let fs = Arc::new(FakeFs::default());
        let config = config().with_plugin_chain(vec![GO_PLUGIN_KEY.to_string()]);
        let report = InitScaffolder::new(config).scaffold(&scaffold(&fs)).unwrap();

        assert!(report.outcome("config/kcp/kustomization.yaml").is_none());
        assert!(fs.get("config/kcp/kustomization.yaml").is_none());
        assert!(report.outcome("main.go").is_some());
    }

    #[test]
    fn second_run_reports_conflicts_without_touching_files() {
        let fs = Arc::new(FakeFs::default());
        InitScaffolder::new(config()).scaffold(&scaffold(&fs)).unwrap();
        let writes = fs.writes();

        let report = InitScaffolder::new(config()).scaffold(&scaffold(&fs)).unwrap();
        assert_eq!(fs.writes(), writes);
        assert!(report.has_failures());
        assert_eq!(
            report.outcome("test/e2e/apibinding.yaml").map(|o| &o.status),
            Some(&FileStatus::Skipped)
        );
        assert!(report.outcome("go.mod").is_some_and(|o| o.status.is_failure()));
    }

    #[test]
    fn force_overwrites_error_if_exists_files() {
        let fs = Arc::new(FakeFs::default());
        fs.seed("go.mod", "module mine\n");
        let report = InitScaffolder::new(config())
            .with_force(true)
            .scaffold(&scaffold(&fs))
            .unwrap();
        assert_eq!(
            report.outcome("go.mod").map(|o| &o.status),
            Some(&FileStatus::Overwritten)
        );
    }

    #[test]
    fn invalid_config_writes_nothing() {
        let fs = Arc::new(FakeFs::default());
        let err = InitScaffolder::new(ProjectConfig::new("widgets", "", "widgets"))
            .scaffold(&scaffold(&fs))
            .unwrap_err();
        assert!(matches!(
            err,
            KcpgenError::Domain(DomainError::MissingRequiredField { .. })
        ));
        assert_eq!(fs.writes(), 0);
    }

    #[test]
    fn kustomize_version_follows_plugin_chain() {
        let init = InitScaffolder::new(config().with_plugin_chain(vec![
            KUSTOMIZE_V2_ALPHA_PLUGIN_KEY.to_string(),
            GO_PLUGIN_KEY.to_string(),
        ]));
        let entries = init.project_entries("");
        assert!(entries.iter().any(|e| e.name() == "makefile"));
        assert_eq!(
            KustomizeVersion::for_plugin_chain(init.config().plugin_chain()),
            KustomizeVersion::V4
        );
    }
}
