//! End-to-end test scaffolding run against a live kcp workspace.

use crate::domain::{
    ContextField, FragmentMap, IfExistsAction, Marker, MarkerLabel, PathPattern, RelativePath,
    RenderingContext, Template, Updater,
};

const E2E_DIR: &str = "test/e2e/%[group]";

/// Insertion points in the e2e controller test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E2eMarker {
    Imports,
}

impl MarkerLabel for E2eMarker {
    fn label(&self) -> &'static str {
        match self {
            Self::Imports => "imports",
        }
    }
}

fn e2e_test_path(multigroup: bool) -> PathPattern {
    if multigroup {
        PathPattern::new(format!("{E2E_DIR}/controller_test.go"))
    } else {
        PathPattern::new("test/e2e/controller_test.go")
    }
}

/// `test/e2e/[<group>/]controller_test.go`.
#[derive(Debug, Clone, Copy)]
pub struct E2eTest {
    multigroup: bool,
}

impl E2eTest {
    pub fn new(multigroup: bool) -> Self {
        Self { multigroup }
    }
}

impl Template for E2eTest {
    fn name(&self) -> &'static str {
        "e2e-test"
    }

    fn path(&self) -> PathPattern {
        e2e_test_path(self.multigroup)
    }

    fn body(&self) -> &'static str {
        E2E_TEST_TEMPLATE
    }

    fn if_exists(&self) -> IfExistsAction {
        IfExistsAction::Skip
    }

    fn requires(&self) -> &'static [ContextField] {
        &[
            ContextField::Boilerplate,
            ContextField::Resource,
            ContextField::ProjectName,
            ContextField::Domain,
        ]
    }
}

/// Adds the API package import to the e2e test.
#[derive(Debug, Clone, Copy)]
pub struct E2eTestUpdater {
    multigroup: bool,
}

impl E2eTestUpdater {
    pub fn new(multigroup: bool) -> Self {
        Self { multigroup }
    }
}

impl Updater for E2eTestUpdater {
    fn name(&self) -> &'static str {
        "e2e-test-updater"
    }

    fn path(&self) -> PathPattern {
        e2e_test_path(self.multigroup)
    }

    fn markers(&self, file: &RelativePath) -> Vec<Marker> {
        vec![Marker::new(file.to_string(), E2eMarker::Imports)]
    }

    fn fragments(&self, ctx: &RenderingContext, file: &RelativePath) -> FragmentMap {
        let imports = match ctx.resource() {
            Some(r) => match r.path.as_deref() {
                Some(path) if !path.is_empty() => {
                    vec![format!("{} \"{path}\"\n", r.import_alias())]
                }
                _ => Vec::new(),
            },
            None => Vec::new(),
        };
        FragmentMap::new().with(Marker::new(file.to_string(), E2eMarker::Imports), imports)
    }
}

fixed_template! {
    /// `test/e2e/apibinding.yaml`, applied by the e2e make target.
    ApiBinding {
        name: "e2e-apibinding",
        path: "test/e2e/apibinding.yaml",
        body: APIBINDING_TEMPLATE,
        if_exists: IfExistsAction::Skip,
        requires: &[ContextField::ProjectName, ContextField::Domain],
    }
}

fixed_template! {
    AuditPolicy {
        name: "e2e-audit-policy",
        path: "test/e2e/audit-policy.yaml",
        body: AUDIT_POLICY_TEMPLATE,
        if_exists: IfExistsAction::Skip,
    }
}

const APIBINDING_TEMPLATE: &str = r#"---
apiVersion: apis.kcp.dev/v1alpha1
kind: APIBinding
metadata:
  name: {{ project_name }}-{{ project_name }}.{{ domain }}
spec:
  reference:
    workspace:
      path: WORKSPACE
      exportName: {{ project_name }}-{{ project_name }}.{{ domain }}
  permissionClaims:
  # TODO (user)

"#;

const AUDIT_POLICY_TEMPLATE: &str = r#"---
apiVersion: audit.k8s.io/v1
kind: Policy
omitStages:
  - RequestReceived
omitManagedFields: true
rules:
  - level: None
    nonResourceURLs:
      - "/api*"
      - "/version"

  - level: Metadata
    resources:
      - group: ""
        resources: ["secrets", "configmaps"]
      - group: "authorization.k8s.io"
        resources: ["subjectaccessreviews"]

  - level: Metadata
    verbs: ["list", "watch"]

  - level: Metadata
    verbs: ["get", "delete"]
    omitStages:
      - ResponseStarted

  - level: RequestResponse
    verbs: ["create", "update", "patch"]
    omitStages:
      - ResponseStarted

"#;

const E2E_TEST_TEMPLATE: &str = r#"{{ boilerplate }}

{% if multigroup and resource.group -%}
package {{ resource.package_name }}
{%- else -%}
package e2e
{%- endif %}

import (
	"context"
	"flag"
	"fmt"
	"math/rand"
	"testing"
	"time"

	kcpclienthelper "github.com/kcp-dev/apimachinery/pkg/client"
	"github.com/kcp-dev/logicalcluster/v2"
	apisv1alpha1 "github.com/kcp-dev/kcp/pkg/apis/apis/v1alpha1"
	tenancyv1alpha1 "github.com/kcp-dev/kcp/pkg/apis/tenancy/v1alpha1"
	"github.com/kcp-dev/kcp/pkg/apis/third_party/conditions/util/conditions"

	// corev1 "k8s.io/api/core/v1"
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
	"k8s.io/apimachinery/pkg/runtime"
	"k8s.io/apimachinery/pkg/util/wait"
	clientgoscheme "k8s.io/client-go/kubernetes/scheme"
	"k8s.io/client-go/rest"

	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/client/config"

	// +kubebuilder:scaffold:imports
)

// The tests in this package expect to be called when:
// - kcp is running
// - a kind cluster is up and running
// - it is hosting a syncer, and the SyncTarget is ready to go
// - the controller-manager from this repo is deployed to kcp
// - that deployment is synced to the kind cluster
// - the deployment is rolled out & ready
//
// We can then check that the controllers defined here are working as expected.

var workspaceName string

func init() {
	rand.Seed(time.Now().Unix())
	flag.StringVar(&workspaceName, "workspace", "", "Workspace in which to run these tests.")
}

func parentWorkspace(t *testing.T) logicalcluster.Name {
	flag.Parse()
	if workspaceName == "" {
		t.Fatal("--workspace cannot be empty")
	}

	return logicalcluster.New(workspaceName)
}

func loadClusterConfig(t *testing.T, clusterName logicalcluster.Name) *rest.Config {
	t.Helper()
	restConfig, err := config.GetConfigWithContext("base")
	if err != nil {
		t.Fatalf("failed to load *rest.Config: %v", err)
	}
	return rest.AddUserAgent(kcpclienthelper.SetCluster(rest.CopyConfig(restConfig), clusterName), t.Name())
}

func loadClient(t *testing.T, clusterName logicalcluster.Name) client.Client {
	t.Helper()
	scheme := runtime.NewScheme()
	if err := clientgoscheme.AddToScheme(scheme); err != nil {
		t.Fatalf("failed to add client go to scheme: %v", err)
	}
	if err := tenancyv1alpha1.AddToScheme(scheme); err != nil {
		t.Fatalf("failed to add %s to scheme: %v", tenancyv1alpha1.SchemeGroupVersion, err)
	}
	if err := {{ resource.import_alias }}.AddToScheme(scheme); err != nil {
		t.Fatalf("failed to add %s to scheme: %v", {{ resource.import_alias }}.GroupVersion, err)
	}
	if err := apisv1alpha1.AddToScheme(scheme); err != nil {
		t.Fatalf("failed to add %s to scheme: %v", apisv1alpha1.SchemeGroupVersion, err)
	}
	tenancyClient, err := client.New(loadClusterConfig(t, clusterName), client.Options{Scheme: scheme})
	if err != nil {
		t.Fatalf("failed to create a client: %v", err)
	}
	return tenancyClient
}

func createWorkspace(t *testing.T, clusterName logicalcluster.Name) client.Client {
	t.Helper()
	parent, ok := clusterName.Parent()
	if !ok {
		t.Fatalf("cluster %s has no parent", clusterName)
	}
	c := loadClient(t, parent)
	t.Logf("creating workspace %s", clusterName)
	if err := c.Create(context.TODO(), &tenancyv1alpha1.ClusterWorkspace{
		ObjectMeta: metav1.ObjectMeta{
			Name: clusterName.Base(),
		},
		Spec: tenancyv1alpha1.ClusterWorkspaceSpec{
			Type: tenancyv1alpha1.ClusterWorkspaceTypeReference{
				Name: "universal",
				Path: "root",
			},
		},
	}); err != nil {
		t.Fatalf("failed to create workspace: %s: %v", clusterName, err)
	}

	t.Logf("waiting for workspace %s to be ready", clusterName)
	var workspace tenancyv1alpha1.ClusterWorkspace
	if err := wait.PollImmediate(100*time.Millisecond, wait.ForeverTestTimeout, func() (done bool, err error) {
		fetchErr := c.Get(context.TODO(), client.ObjectKey{Name: clusterName.Base()}, &workspace)
		if fetchErr != nil {
			t.Logf("failed to get workspace %s: %v", clusterName, err)
			return false, fetchErr
		}
		var reason string
		if actual, expected := workspace.Status.Phase, tenancyv1alpha1.ClusterWorkspacePhaseReady; actual != expected {
			reason = fmt.Sprintf("phase is %s, not %s", actual, expected)
			t.Logf("not done waiting for workspace %s to be ready: %s", clusterName, reason)
		}
		return reason == "", nil
	}); err != nil {
		t.Fatalf("workspace %s never ready: %v", clusterName, err)
	}

	return createAPIBinding(t, clusterName)
}

func createAPIBinding(t *testing.T, workspaceCluster logicalcluster.Name) client.Client {
	c := loadClient(t, workspaceCluster)
	apiName := "{{ project_name }}-{{ project_name }}.{{ domain }}"
	t.Logf("creating APIBinding %s|%s", workspaceCluster, apiName)
	if err := c.Create(context.TODO(), &apisv1alpha1.APIBinding{
		ObjectMeta: metav1.ObjectMeta{
			Name: apiName,
		},
		Spec: apisv1alpha1.APIBindingSpec{
			Reference: apisv1alpha1.ExportReference{
				Workspace: &apisv1alpha1.WorkspaceExportReference{
					Path:       parentWorkspace(t).String(),
					ExportName: apiName,
				},
			},
			// TODO(user): PermissionClaims need to be configured for the desired resources
			// Example:
			// PermissionClaims: []apisv1alpha1.AcceptablePermissionClaim{
			//      {
			//              PermissionClaim: apisv1alpha1.PermissionClaim{
			//                      GroupResource: apisv1alpha1.GroupResource{Resource: "configmaps"},
			//              },
			//              State: apisv1alpha1.ClaimAccepted,
			//      },
			// },
		},
	}); err != nil {
		t.Fatalf("could not create APIBinding %s|%s: %v", workspaceCluster, apiName, err)
	}

	t.Logf("waiting for APIBinding %s|%s to be bound", workspaceCluster, apiName)
	var apiBinding apisv1alpha1.APIBinding
	if err := wait.PollImmediate(100*time.Millisecond, wait.ForeverTestTimeout, func() (done bool, err error) {
		fetchErr := c.Get(context.TODO(), client.ObjectKey{Name: apiName}, &apiBinding)
		if fetchErr != nil {
			t.Logf("failed to get APIBinding %s|%s: %v", workspaceCluster, apiName, err)
			return false, fetchErr
		}
		var reason string
		if !conditions.IsTrue(&apiBinding, apisv1alpha1.InitialBindingCompleted) {
			condition := conditions.Get(&apiBinding, apisv1alpha1.InitialBindingCompleted)
			if condition != nil {
				reason = fmt.Sprintf("%s: %s", condition.Reason, condition.Message)
			} else {
				reason = "no condition present"
			}
			t.Logf("not done waiting for APIBinding %s|%s to be bound: %s", workspaceCluster, apiName, reason)
		}
		return conditions.IsTrue(&apiBinding, apisv1alpha1.InitialBindingCompleted), nil
	}); err != nil {
		t.Fatalf("APIBinding %s|%s never bound: %v", workspaceCluster, apiName, err)
	}

	return c
}

const characters = "abcdefghijklmnopqrstuvwxyz"

func randomName() string {
	b := make([]byte, 10)
	for i := range b {
		b[i] = characters[rand.Intn(len(characters))]
	}
	return string(b)
}

// TestController verifies that the controller behavior works.
func TestController(t *testing.T) {
	t.Parallel()
	for i := 0; i < 3; i++ {
		t.Run(fmt.Sprintf("attempt-%d", i), func(t *testing.T) {
			t.Parallel()
			workspaceCluster := parentWorkspace(t).Join(randomName())
			c := createWorkspace(t, workspaceCluster)
			t.Logf("workspace client %v", c)

			// TODO(user): Create resources and check that the desired reconciliation took place.
			// Example:
			// if err := c.Create(context.TODO(), &{{ resource.import_alias }}.{{ resource.kind }}{
			//     ObjectMeta: metav1.ObjectMeta{Name: fmt.Sprintf("resource-%d", i)},
			//     Spec: {{ resource.import_alias }}.{{ resource.kind }}Spec{},
			// }); err != nil {
			//     t.Fatalf("failed to create {{ resource.kind }}: %v", err)
			// }
		})
	}
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectConfig, Resource};

    #[test]
    fn updater_imports_api_package() {
        let config = ProjectConfig::new("widgets", "example.com", "widgets");
        let resource = Resource::new("apps", "v1", "Widget").with_path("widgets/api/v1");
        let updater = E2eTestUpdater::new(false);
        let file = updater.path().resolve(Some(&resource)).unwrap();
        let ctx = RenderingContext::from_config(&config).with_resource(resource);
        let map = updater.fragments(&ctx, &file);
        let marker = Marker::new("test/e2e/controller_test.go", E2eMarker::Imports);
        assert_eq!(
            map.get(&marker).map(<[String]>::to_vec),
            Some(vec!["appsv1 \"widgets/api/v1\"\n".to_string()])
        );
    }

    #[test]
    fn updater_without_api_path_adds_nothing() {
        let config = ProjectConfig::new("widgets", "example.com", "widgets");
        let updater = E2eTestUpdater::new(false);
        let file = updater.path().resolve(None).unwrap();
        let ctx = RenderingContext::from_config(&config)
            .with_resource(Resource::new("apps", "v1", "Widget"));
        assert!(updater.fragments(&ctx, &file).is_empty());
    }

    #[test]
    fn multigroup_path_nests_by_group() {
        let widget = Resource::new("apps", "v1", "Widget");
        assert_eq!(
            E2eTest::new(true).path().resolve(Some(&widget)).unwrap().to_string(),
            "test/e2e/apps/controller_test.go"
        );
        assert_eq!(
            E2eTestUpdater::new(false).path().resolve(Some(&widget)).unwrap().to_string(),
            "test/e2e/controller_test.go"
        );

        let updater = E2eTestUpdater::new(true);
        let file = updater.path().resolve(Some(&widget)).unwrap();
        assert_eq!(
            updater.markers(&file)[0].file(),
            "test/e2e/apps/controller_test.go"
        );
    }

    #[test]
    fn fixtures_are_skipped_when_present() {
        assert_eq!(ApiBinding.if_exists(), IfExistsAction::Skip);
        assert_eq!(AuditPolicy.if_exists(), IfExistsAction::Skip);
    }
}
