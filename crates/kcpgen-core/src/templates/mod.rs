//! Built-in template catalogue for kcp-aware controller projects.
//!
//! Bodies are Tera templates over [`RenderingContext`](crate::domain::RenderingContext)
//! plus each template's own locals. Go sources carry `// +kubebuilder:scaffold:<label>`
//! sentinels that the updaters in this module target later.
//!
//! The catalogue is data only: choosing which entries run, and in what order,
//! is up to the scaffolders in `application::services`.

/// Defines a unit-struct template with a fixed path, body and policy.
macro_rules! fixed_template {
    (
        $(#[$meta:meta])*
        $name:ident {
            name: $tname:literal,
            path: $path:literal,
            body: $body:expr,
            $(if_exists: $action:expr,)?
            $(requires: $req:expr,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::domain::Template for $name {
            fn name(&self) -> &'static str {
                $tname
            }

            fn path(&self) -> $crate::domain::PathPattern {
                $crate::domain::PathPattern::new($path)
            }

            fn body(&self) -> &'static str {
                $body
            }

            $(
                fn if_exists(&self) -> $crate::domain::IfExistsAction {
                    $action
                }
            )?

            $(
                fn requires(&self) -> &'static [$crate::domain::ContextField] {
                    $req
                }
            )?
        }
    };
}

pub mod api;
pub mod controllers;
pub mod e2e;
pub mod hack;
pub mod kcp;
pub mod project;

pub use api::{Group, Types};
pub use controllers::{Controller, SuiteMarker, SuiteTest, SuiteTestUpdater};
pub use e2e::{ApiBinding, AuditPolicy, E2eMarker, E2eTest, E2eTestUpdater};
pub use hack::{BOILERPLATE_PATH, Boilerplate};
pub use project::{
    DockerIgnore, Dockerfile, GitIgnore, GoMod, MAIN_PATH, Main, MainMarker, MainUpdater,
    Makefile, Readme,
};

/// Directory holding a resource's API package, as a path pattern.
pub(crate) fn api_dir(multigroup: bool) -> &'static str {
    if multigroup {
        "apis/%[group]/%[version]"
    } else {
        "api/%[version]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KustomizeVersion, License, MarkerLabel, Template, ToolVersions};

    fn assert_has_sentinels(body: &str, labels: &[&str], prefix: &str) {
        for label in labels {
            let sentinel = format!("{prefix} +kubebuilder:scaffold:{label}");
            assert!(body.contains(&sentinel), "missing '{sentinel}'");
        }
    }

    #[test]
    fn main_body_carries_every_main_marker() {
        let labels: Vec<&str> = MainMarker::ALL.iter().map(|m| m.label()).collect();
        assert_has_sentinels(Main.body(), &labels, "//");
    }

    #[test]
    fn suite_body_carries_every_suite_marker() {
        let labels: Vec<&str> = SuiteMarker::ALL.iter().map(|m| m.label()).collect();
        assert_has_sentinels(SuiteTest::new(false, true).body(), &labels, "//");
    }

    #[test]
    fn e2e_body_carries_import_marker() {
        assert_has_sentinels(E2eTest::new(false).body(), &[E2eMarker::Imports.label()], "//");
    }

    #[test]
    fn bodies_avoid_tera_comment_opener() {
        let versions = ToolVersions::default();
        let bodies = [
            Main.body(),
            GoMod::new(&versions).body(),
            GitIgnore.body(),
            Makefile::new(&versions, KustomizeVersion::V3, BOILERPLATE_PATH).body(),
            Dockerfile.body(),
            DockerIgnore.body(),
            Readme::new("").body(),
            Boilerplate::new(License::Apache2, "", "2026").body(),
            Types::new(false, true).body(),
            Group::new(false).body(),
            Controller::new(false, "").body(),
            SuiteTest::new(false, true).body(),
            E2eTest::new(false).body(),
            ApiBinding.body(),
            AuditPolicy.body(),
            kcp::Kustomization.body(),
            kcp::ClusterRole.body(),
            kcp::ClusterRoleBinding.body(),
            kcp::ApiResourceSchemas.body(),
            kcp::DefaultKustomization.body(),
            kcp::DefaultKustomizeConfig.body(),
            kcp::ManagerPatch.body(),
            kcp::ApiExport.body(),
            kcp::PatchApiExport.body(),
        ];
        for body in bodies {
            assert!(!body.contains("{#"));
        }
    }

    #[test]
    fn api_dir_depends_on_layout() {
        assert_eq!(api_dir(false), "api/%[version]");
        assert_eq!(api_dir(true), "apis/%[group]/%[version]");
    }
}
