//! Controller package: the reconciler and its envtest suite.

use crate::domain::{
    ContextField, FragmentMap, IfExistsAction, Locals, Marker, MarkerLabel, PathPattern,
    RelativePath, RenderingContext, Template, Updater, locals,
};

const SUITE_FILE: &str = "suite_test.go";

fn controllers_path(multigroup: bool, file: &str) -> PathPattern {
    if multigroup {
        PathPattern::new(format!("controllers/%[group]/{file}"))
    } else {
        PathPattern::new(format!("controllers/{file}"))
    }
}

/// `<kind>_controller.go`.
#[derive(Debug, Clone)]
pub struct Controller {
    multigroup: bool,
    controller_runtime_version: String,
}

impl Controller {
    pub fn new(multigroup: bool, controller_runtime_version: impl Into<String>) -> Self {
        Self {
            multigroup,
            controller_runtime_version: controller_runtime_version.into(),
        }
    }
}

impl Template for Controller {
    fn name(&self) -> &'static str {
        "controller"
    }

    fn path(&self) -> PathPattern {
        controllers_path(self.multigroup, "%[kind]_controller.go")
    }

    fn body(&self) -> &'static str {
        CONTROLLER_TEMPLATE
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::Boilerplate, ContextField::Resource]
    }

    fn locals(&self) -> Locals {
        locals([(
            "controller_runtime_version",
            self.controller_runtime_version.as_str().into(),
        )])
    }
}

/// Insertion points in the envtest suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteMarker {
    Imports,
    Scheme,
}

impl SuiteMarker {
    pub const ALL: [SuiteMarker; 2] = [Self::Imports, Self::Scheme];
}

impl MarkerLabel for SuiteMarker {
    fn label(&self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Scheme => "scheme",
        }
    }
}

/// `suite_test.go`, the envtest bootstrap for the controller package.
#[derive(Debug, Clone, Copy)]
pub struct SuiteTest {
    multigroup: bool,
    has_api: bool,
}

impl SuiteTest {
    pub fn new(multigroup: bool, has_api: bool) -> Self {
        Self { multigroup, has_api }
    }
}

impl Template for SuiteTest {
    fn name(&self) -> &'static str {
        "suite-test"
    }

    fn path(&self) -> PathPattern {
        controllers_path(self.multigroup, SUITE_FILE)
    }

    fn body(&self) -> &'static str {
        SUITE_TEST_TEMPLATE
    }

    fn if_exists(&self) -> IfExistsAction {
        IfExistsAction::Skip
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::Boilerplate, ContextField::Resource]
    }

    fn locals(&self) -> Locals {
        locals([("error_if_crd_path_missing", self.has_api.into())])
    }
}

/// Registers a new API package with the envtest scheme.
#[derive(Debug, Clone, Copy)]
pub struct SuiteTestUpdater {
    multigroup: bool,
}

impl SuiteTestUpdater {
    pub fn new(multigroup: bool) -> Self {
        Self { multigroup }
    }
}

impl Updater for SuiteTestUpdater {
    fn name(&self) -> &'static str {
        "suite-test-updater"
    }

    fn path(&self) -> PathPattern {
        controllers_path(self.multigroup, SUITE_FILE)
    }

    fn markers(&self, file: &RelativePath) -> Vec<Marker> {
        SuiteMarker::ALL
            .iter()
            .map(|m| Marker::new(file.to_string(), *m))
            .collect()
    }

    fn fragments(&self, ctx: &RenderingContext, file: &RelativePath) -> FragmentMap {
        let Some(resource) = ctx.resource() else {
            return FragmentMap::new();
        };
        let Some(path) = resource.path.as_deref().filter(|p| !p.is_empty()) else {
            return FragmentMap::new();
        };
        let alias = resource.import_alias();

        FragmentMap::new()
            .with(
                Marker::new(file.to_string(), SuiteMarker::Imports),
                vec![format!("{alias} \"{path}\"\n")],
            )
            .with(
                Marker::new(file.to_string(), SuiteMarker::Scheme),
                vec![format!(
                    "err = {alias}.AddToScheme(scheme.Scheme)\nExpect(err).NotTo(HaveOccurred())\n\n"
                )],
            )
    }
}

const CONTROLLER_TEMPLATE: &str = r#"{{ boilerplate }}

package {% if multigroup and resource.group %}{{ resource.package_name }}{% else %}controllers{% endif %}

import (
	"context"

	"github.com/kcp-dev/logicalcluster/v2"
	"k8s.io/apimachinery/pkg/runtime"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/log"
{%- if resource.path %}
	{{ resource.import_alias }} "{{ resource.path }}"
{%- endif %}
)

// {{ resource.kind }}Reconciler reconciles a {{ resource.kind }} object
type {{ resource.kind }}Reconciler struct {
	client.Client
	Scheme *runtime.Scheme
}

//+kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }},verbs=get;list;watch;create;update;patch;delete
//+kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }}/status,verbs=get;update;patch
//+kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }}/finalizers,verbs=update

// Reconcile is part of the main kubernetes reconciliation loop which aims to
// move the current state of the cluster closer to the desired state.
// TODO(user): Modify the Reconcile function to compare the state specified by
// the {{ resource.kind }} object against the actual cluster state, and then
// perform operations to make the cluster state reflect the state specified by
// the user.
//
// For more details, check Reconcile and its Result here:
// - https://pkg.go.dev/sigs.k8s.io/controller-runtime@{{ controller_runtime_version }}/pkg/reconcile
func (r *{{ resource.kind }}Reconciler) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {
	logger := log.FromContext(ctx)

	// Include the clusterName from req.ObjectKey in the logger, similar to the namespace and name keys that are already
	// there.
	logger = logger.WithValues("clusterName", req.ClusterName)
	logger.V(1).Info("Starting reconcile")

	// Add the logical cluster to the context
	ctx = logicalcluster.WithCluster(ctx, logicalcluster.New(req.ClusterName))

	// TODO(user): your logic here

	return ctrl.Result{}, nil
}

// SetupWithManager sets up the controller with the Manager.
func (r *{{ resource.kind }}Reconciler) SetupWithManager(mgr ctrl.Manager) error {
	return ctrl.NewControllerManagedBy(mgr).
{%- if resource.path %}
		For(&{{ resource.import_alias }}.{{ resource.kind }}{}).
{%- else %}
		// Uncomment the following line adding a pointer to an instance of the controlled resource as an argument
		// For().
{%- endif %}
		Complete(r)
}
"#;

const SUITE_TEST_TEMPLATE: &str = r#"{{ boilerplate }}

package {% if multigroup and resource.group %}{{ resource.package_name }}{% else %}controllers{% endif %}

import (
	"path/filepath"
	"testing"

	. "github.com/onsi/ginkgo/v2"
	. "github.com/onsi/gomega"

	"k8s.io/client-go/kubernetes/scheme"
	"k8s.io/client-go/rest"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/envtest"
	logf "sigs.k8s.io/controller-runtime/pkg/log"
	"sigs.k8s.io/controller-runtime/pkg/log/zap"

	// +kubebuilder:scaffold:imports
)

// These tests use Ginkgo (BDD-style Go testing framework). Refer to
// http://onsi.github.io/ginkgo/ to learn more about Ginkgo.

var cfg *rest.Config
var k8sClient client.Client
var testEnv *envtest.Environment

func TestAPIs(t *testing.T) {
	RegisterFailHandler(Fail)

	RunSpecs(t, "Controller Suite")
}

var _ = BeforeSuite(func() {
	logf.SetLogger(zap.New(zap.WriteTo(GinkgoWriter), zap.UseDevMode(true)))

	By("bootstrapping test environment")
	testEnv = &envtest.Environment{
		CRDDirectoryPaths:     []string{filepath.Join({% if multigroup and resource.group %}"..", ".."{% else %}".."{% endif %}, "config", "crd", "bases")},
		ErrorIfCRDPathMissing: {% if error_if_crd_path_missing %}true{% else %}false{% endif %},
	}

	var err error
	// cfg is defined in this file globally.
	cfg, err = testEnv.Start()
	Expect(err).NotTo(HaveOccurred())
	Expect(cfg).NotTo(BeNil())

	// +kubebuilder:scaffold:scheme

	k8sClient, err = client.New(cfg, client.Options{Scheme: scheme.Scheme})
	Expect(err).NotTo(HaveOccurred())
	Expect(k8sClient).NotTo(BeNil())

})

var _ = AfterSuite(func() {
	By("tearing down the test environment")
	err := testEnv.Stop()
	Expect(err).NotTo(HaveOccurred())
})
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalValue, ProjectConfig, Resource};

    fn widget() -> Resource {
        Resource::new("apps", "v1", "Widget")
    }

    #[test]
    fn controller_path_follows_layout() {
        assert_eq!(
            Controller::new(false, "v0.11.2").path().resolve(Some(&widget())).unwrap().to_string(),
            "controllers/widget_controller.go"
        );
        assert_eq!(
            Controller::new(true, "v0.11.2").path().resolve(Some(&widget())).unwrap().to_string(),
            "controllers/apps/widget_controller.go"
        );
        assert_eq!(Controller::new(false, "").if_exists(), IfExistsAction::Error);
    }

    #[test]
    fn suite_marks_crd_path_required_only_with_api() {
        assert_eq!(
            SuiteTest::new(false, true).locals().get("error_if_crd_path_missing"),
            Some(&LocalValue::Bool(true))
        );
        assert_eq!(
            SuiteTest::new(false, false).locals().get("error_if_crd_path_missing"),
            Some(&LocalValue::Bool(false))
        );
        assert_eq!(SuiteTest::new(false, true).if_exists(), IfExistsAction::Skip);
    }

    #[test]
    fn suite_updater_registers_api_scheme() {
        let config = ProjectConfig::new("widgets", "example.com", "widgets");
        let resource = widget().with_path("widgets/api/v1");
        let updater = SuiteTestUpdater::new(false);
        let file = updater.path().resolve(Some(&resource)).unwrap();
        let ctx = RenderingContext::from_config(&config).with_resource(resource);
        let map = updater.fragments(&ctx, &file);

        assert_eq!(
            map.get(&Marker::new("controllers/suite_test.go", SuiteMarker::Imports))
                .map(<[String]>::to_vec),
            Some(vec!["appsv1 \"widgets/api/v1\"\n".to_string()])
        );
        let scheme = map
            .get(&Marker::new("controllers/suite_test.go", SuiteMarker::Scheme))
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        assert_eq!(scheme.len(), 1);
        assert!(scheme[0].starts_with("err = appsv1.AddToScheme(scheme.Scheme)\n"));
    }

    #[test]
    fn suite_markers_name_the_grouped_file() {
        let updater = SuiteTestUpdater::new(true);
        let file = updater.path().resolve(Some(&widget())).unwrap();
        let markers = updater.markers(&file);

        assert_eq!(markers.len(), SuiteMarker::ALL.len());
        assert!(markers.iter().all(|m| m.file() == "controllers/apps/suite_test.go"));
    }

    #[test]
    fn suite_updater_skips_resource_without_package() {
        let config = ProjectConfig::new("widgets", "example.com", "widgets");
        let updater = SuiteTestUpdater::new(false);
        let file = updater.path().resolve(Some(&widget())).unwrap();
        let ctx = RenderingContext::from_config(&config).with_resource(widget());
        assert!(updater.fragments(&ctx, &file).is_empty());
    }
}
