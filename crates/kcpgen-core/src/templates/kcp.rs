//! kcp kustomize overlays: `config/kcp` and `config/default-kcp`.
//!
//! Every file here is meant to be hand-tuned after generation, so all of them
//! are skipped when already present.

use crate::domain::{ContextField, IfExistsAction};

const PROJECT_FIELDS: &[ContextField] = &[ContextField::ProjectName, ContextField::Domain];

fixed_template! {
    Kustomization {
        name: "kcp-kustomization",
        path: "config/kcp/kustomization.yaml",
        body: KUSTOMIZATION_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

fixed_template! {
    ClusterRole {
        name: "kcp-clusterrole",
        path: "config/kcp/clusterrole.yaml",
        body: CLUSTER_ROLE_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

fixed_template! {
    ClusterRoleBinding {
        name: "kcp-clusterrolebinding",
        path: "config/kcp/clusterrolebinding.yaml",
        body: CLUSTER_ROLE_BINDING_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

fixed_template! {
    /// Placeholder filled by `make apiresourceschemas`.
    ApiResourceSchemas {
        name: "kcp-apiresourceschemas",
        path: "config/kcp/apiresourceschemas.yaml",
        body: API_RESOURCE_SCHEMAS_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

fixed_template! {
    /// The controller's APIExport, named `<project>.<domain>`.
    ApiExport {
        name: "kcp-apiexport",
        path: "config/kcp/apiexport.yaml",
        body: API_EXPORT_TEMPLATE,
        if_exists: IfExistsAction::Skip,
        requires: PROJECT_FIELDS,
    }
}

fixed_template! {
    PatchApiExport {
        name: "kcp-patch-apiexport",
        path: "config/kcp/patch_apiexport.yaml",
        body: PATCH_API_EXPORT_TEMPLATE,
        if_exists: IfExistsAction::Skip,
        requires: &[ContextField::ProjectName, ContextField::Domain, ContextField::Resource],
    }
}

fixed_template! {
    DefaultKustomization {
        name: "default-kcp-kustomization",
        path: "config/default-kcp/kustomization.yaml",
        body: DEFAULT_KUSTOMIZATION_TEMPLATE,
        if_exists: IfExistsAction::Skip,
        requires: PROJECT_FIELDS,
    }
}

fixed_template! {
    DefaultKustomizeConfig {
        name: "default-kcp-kustomizeconfig",
        path: "config/default-kcp/kustomizeconfig.yaml",
        body: DEFAULT_KUSTOMIZE_CONFIG_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

fixed_template! {
    /// Passes the APIExport name to the manager container.
    ManagerPatch {
        name: "default-kcp-manager-patch",
        path: "config/default-kcp/manager_patch.yaml",
        body: MANAGER_PATCH_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

const KUSTOMIZATION_TEMPLATE: &str = r#"# These resources are the kcp specific manifests
resources:
  - apiresourceschemas.yaml
  - apiexport.yaml
  - clusterrole.yaml
  - clusterrolebinding.yaml

patchesStrategicMerge:
  - patch_apiexport.yaml
"#;

const CLUSTER_ROLE_TEMPLATE: &str = r#"# This contains the rights required by the controller
---
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  creationTimestamp: null
  name: kcp-manager-role
rules:
- apiGroups:
  - apis.kcp.dev
  resources:
  - apiexports
  verbs:
  - get
  - list
  - watch
- apiGroups:
  - apis.kcp.dev
  resources:
  - apiexports/content
  verbs:
  - '*'

"#;

const CLUSTER_ROLE_BINDING_TEMPLATE: &str = r#"# This contains the clusterrolebinding for the controller
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: kcp-manager-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: kcp-manager-role
subjects:
- kind: ServiceAccount
  name: controller-manager
  namespace: system

"#;

const API_RESOURCE_SCHEMAS_TEMPLATE: &str = "# APIResourceschemas for the controller custom resources\n";

const API_EXPORT_TEMPLATE: &str = r#"# Controller APIExport
apiVersion: apis.kcp.dev/v1alpha1
kind: APIExport
metadata:
  name: {{ project_name }}.{{ domain }}
spec:
"#;

const PATCH_API_EXPORT_TEMPLATE: &str = r#"# Set the reference to the latest APIResourceSchema
---
apiVersion: apis.kcp.dev/v1alpha1
kind: APIExport
metadata:
  name: {{ project_name }}.{{ domain }}
spec:
  latestResourceSchemas:
     - PREFIX.{{ resource.plural }}.{{ domain }}

"#;

const DEFAULT_KUSTOMIZATION_TEMPLATE: &str = r#"# These resources are the kcp specific manifests
# Adds namespace to all resources.
namespace: {{ project_name }}-system

# Value of this field is prepended to the
# names of all resources, e.g. a deployment named
# "wordpress" becomes "alices-wordpress".
# Note that it should also match with the prefix (text before '-') of the namespace
# field above.
namePrefix: {{ project_name }}-

# Labels to add to all resources and selectors.
#commonLabels:
#  someName: someValue

bases:
- ../kcp
- ../rbac
- ../manager

patchesStrategicMerge:
- manager_patch.yaml

configurations:
- kustomizeconfig.yaml

# Adjust to prefix
vars:
- name: API_EXPORT_NAME
  objref:
    apiVersion: apis.kcp.dev/v1alpha1
    kind: APIExport
    name: {{ project_name }}.{{ domain }}
  fieldref:
    fieldPath: metadata.name
"#;

const DEFAULT_KUSTOMIZE_CONFIG_TEMPLATE: &str = r#"nameReference:
- kind: APIResourceSchema
  fieldSpecs:
  - kind: APIExport
    path: spec/latestResourceSchemas
- kind: ConfigMap
  fieldSpecs:
  - kind: Deployment
    path: spec/volumes/configMap/name

"#;

const MANAGER_PATCH_TEMPLATE: &str = r#"# Pass the name of the APIExport to the controller
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: controller-manager
  namespace: system
spec:
  template:
    spec:
      containers:
      - name: manager
        args:
        - "--api-export-name=$(API_EXPORT_NAME)"
{%- if not component_config %}
        - --leader-elect
{%- endif %}

"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Template;

    #[test]
    fn overlay_files_are_never_overwritten() {
        let templates: [&dyn Template; 9] = [
            &Kustomization,
            &ClusterRole,
            &ClusterRoleBinding,
            &ApiResourceSchemas,
            &ApiExport,
            &PatchApiExport,
            &DefaultKustomization,
            &DefaultKustomizeConfig,
            &ManagerPatch,
        ];
        for t in templates {
            assert_eq!(t.if_exists(), IfExistsAction::Skip, "{}", t.name());
            assert!(!t.path().has_placeholders());
        }
    }

    #[test]
    fn patch_needs_resource() {
        assert!(PatchApiExport.requires().contains(&ContextField::Resource));
        assert!(!ApiExport.requires().contains(&ContextField::Resource));
    }
}
