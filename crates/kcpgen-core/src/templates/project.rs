//! Project-level files written once by init: entry point, module file,
//! build recipes, container files and docs.

use crate::domain::{
    ContextField, FragmentMap, IfExistsAction, KustomizeVersion, LocalValue, Locals, Marker,
    MarkerLabel, PathPattern, RelativePath, RenderingContext, Template, ToolVersions, Updater,
    locals,
};

pub const MAIN_PATH: &str = "main.go";

/// Insertion points in `main.go`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMarker {
    Imports,
    Scheme,
    Builder,
}

impl MainMarker {
    pub const ALL: [MainMarker; 3] = [Self::Imports, Self::Scheme, Self::Builder];
}

impl MarkerLabel for MainMarker {
    fn label(&self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Scheme => "scheme",
            Self::Builder => "builder",
        }
    }
}

fixed_template! {
    /// Controller manager entry point.
    Main {
        name: "main",
        path: "main.go",
        body: MAIN_TEMPLATE,
        requires: &[ContextField::Boilerplate, ContextField::Repo, ContextField::Domain],
    }
}

/// Wires a new API and/or controller into `main.go`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainUpdater {
    pub wire_resource: bool,
    pub wire_controller: bool,
}

impl MainUpdater {
    pub fn new(wire_resource: bool, wire_controller: bool) -> Self {
        Self {
            wire_resource,
            wire_controller,
        }
    }
}

impl Updater for MainUpdater {
    fn name(&self) -> &'static str {
        "main-updater"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new(MAIN_PATH)
    }

    fn markers(&self, file: &RelativePath) -> Vec<Marker> {
        MainMarker::ALL
            .iter()
            .map(|m| Marker::new(file.to_string(), *m))
            .collect()
    }

    fn fragments(&self, ctx: &RenderingContext, file: &RelativePath) -> FragmentMap {
        let Some(resource) = ctx.resource() else {
            return FragmentMap::new();
        };
        let alias = resource.import_alias();
        let grouped = ctx.grouped_layout();

        let mut imports = Vec::new();
        let mut scheme = Vec::new();
        let mut setup = Vec::new();

        if self.wire_resource {
            imports.push(format!(
                "{alias} \"{}\"\n",
                resource.path.as_deref().unwrap_or_default()
            ));
            scheme.push(format!("utilruntime.Must({alias}.AddToScheme(scheme))\n"));
        }

        if self.wire_controller {
            let reconciler = if grouped {
                let pkg = resource.package_name();
                imports.push(format!(
                    "{pkg}controllers \"{}/controllers/{}\"\n",
                    ctx.repo(),
                    resource.group
                ));
                format!("{pkg}controllers.{}Reconciler", resource.kind)
            } else {
                imports.push(format!("\"{}/controllers\"\n", ctx.repo()));
                format!("controllers.{}Reconciler", resource.kind)
            };
            setup.push(format!(
                "if err = (&{reconciler}{{\n\
                 \tClient: mgr.GetClient(),\n\
                 \tScheme: mgr.GetScheme(),\n\
                 }}).SetupWithManager(mgr); err != nil {{\n\
                 \tsetupLog.Error(err, \"unable to create controller\", \"controller\", \"{kind}\")\n\
                 \tos.Exit(1)\n\
                 }}\n",
                kind = resource.kind
            ));
        }

        let marker = |label| Marker::new(file.to_string(), label);
        FragmentMap::new()
            .with(marker(MainMarker::Imports), imports)
            .with(marker(MainMarker::Scheme), scheme)
            .with(marker(MainMarker::Builder), setup)
    }
}

/// Go module file.
#[derive(Debug, Clone)]
pub struct GoMod {
    controller_runtime_version: String,
}

impl GoMod {
    pub fn new(versions: &ToolVersions) -> Self {
        Self {
            controller_runtime_version: versions.controller_runtime.clone(),
        }
    }
}

impl Template for GoMod {
    fn name(&self) -> &'static str {
        "go-mod"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new("go.mod")
    }

    fn body(&self) -> &'static str {
        GO_MOD_TEMPLATE
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::Repo]
    }

    fn locals(&self) -> Locals {
        locals([(
            "controller_runtime_version",
            LocalValue::from(self.controller_runtime_version.as_str()),
        )])
    }
}

fixed_template! {
    GitIgnore {
        name: "gitignore",
        path: ".gitignore",
        body: GITIGNORE_TEMPLATE,
    }
}

/// Build recipes, with tool versions pinned at init time.
#[derive(Debug, Clone)]
pub struct Makefile {
    versions: ToolVersions,
    kustomize: KustomizeVersion,
    boilerplate_path: String,
}

impl Makefile {
    pub fn new(
        versions: &ToolVersions,
        kustomize: KustomizeVersion,
        boilerplate_path: impl Into<String>,
    ) -> Self {
        Self {
            versions: versions.clone(),
            kustomize,
            boilerplate_path: boilerplate_path.into(),
        }
    }
}

impl Template for Makefile {
    fn name(&self) -> &'static str {
        "makefile"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new("Makefile")
    }

    fn body(&self) -> &'static str {
        MAKEFILE_TEMPLATE
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::ProjectName, ContextField::Domain]
    }

    fn locals(&self) -> Locals {
        let v = &self.versions;
        locals([
            ("registry", v.registry.as_str().into()),
            ("image", v.image.as_str().into()),
            ("boilerplate_path", self.boilerplate_path.as_str().into()),
            ("controller_tools_version", v.controller_tools.as_str().into()),
            ("kustomize_version", self.kustomize.as_str().into()),
            ("controller_runtime_version", v.controller_runtime.as_str().into()),
            ("kcp_version", v.kcp.as_str().into()),
            ("yq_version", v.yq.as_str().into()),
            ("envtest_k8s", v.envtest_k8s.as_str().into()),
        ])
    }
}

fixed_template! {
    Dockerfile {
        name: "dockerfile",
        path: "Dockerfile",
        body: DOCKERFILE_TEMPLATE,
    }
}

fixed_template! {
    DockerIgnore {
        name: "dockerignore",
        path: ".dockerignore",
        body: DOCKERIGNORE_TEMPLATE,
    }
}

/// README with the license text lifted out of the boilerplate comment.
#[derive(Debug, Clone)]
pub struct Readme {
    license: String,
}

impl Readme {
    pub fn new(boilerplate: &str) -> Self {
        Self {
            license: boilerplate.replacen("/*", "", 1).replacen("*/", "", 1),
        }
    }
}

impl Template for Readme {
    fn name(&self) -> &'static str {
        "readme"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new("README.md")
    }

    fn body(&self) -> &'static str {
        README_TEMPLATE
    }

    fn if_exists(&self) -> IfExistsAction {
        IfExistsAction::Error
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::ProjectName]
    }

    fn locals(&self) -> Locals {
        locals([("license", self.license.as_str().into())])
    }
}

// ── Bodies ───────────────────────────────────────────────────────────────────

const MAIN_TEMPLATE: &str = r#"{{ boilerplate }}

package main

import (
	"context"
	"flag"
	"fmt"
	"os"

	apisv1alpha1 "github.com/kcp-dev/kcp/pkg/apis/apis/v1alpha1"

	"k8s.io/apimachinery/pkg/runtime"
	"k8s.io/apimachinery/pkg/types"
	utilruntime "k8s.io/apimachinery/pkg/util/runtime"
	"k8s.io/client-go/discovery"
	clientgoscheme "k8s.io/client-go/kubernetes/scheme"
	"k8s.io/client-go/rest"
	// Import all Kubernetes client auth plugins (e.g. Azure, GCP, OIDC, etc.)
	// to ensure that exec-entrypoint and run can make use of them.
	_ "k8s.io/client-go/plugin/pkg/client/auth"

	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/healthz"
	"sigs.k8s.io/controller-runtime/pkg/kcp"
	"sigs.k8s.io/controller-runtime/pkg/log/zap"

	// +kubebuilder:scaffold:imports
)

var (
	scheme   = runtime.NewScheme()
	setupLog = ctrl.Log.WithName("setup")
)

func init() {
	utilruntime.Must(clientgoscheme.AddToScheme(scheme))

	// +kubebuilder:scaffold:scheme
}

func main() {
{%- if not component_config %}
	var metricsAddr string
	var enableLeaderElection bool
	var probeAddr string
	var apiExportName string
	flag.StringVar(&apiExportName, "api-export-name", "", "The name of the APIExport.")
	flag.StringVar(&metricsAddr, "metrics-bind-address", ":8080", "The address the metric endpoint binds to.")
	flag.StringVar(&probeAddr, "health-probe-bind-address", ":8081", "The address the probe endpoint binds to.")
	flag.BoolVar(&enableLeaderElection, "leader-elect", false,
		"Enable leader election for controller manager. "+
			"Enabling this will ensure there is only one active controller manager.")
{%- else %}
	var configFile string
	var apiExportName string
	flag.StringVar(&apiExportName, "api-export-name", "", "The name of the APIExport.")
	flag.StringVar(&configFile, "config", "",
		"The controller will load its initial configuration from this file. "+
			"Omit this flag to use the default configuration values. "+
			"Command-line flags override configuration from this file.")
{%- endif %}
	opts := zap.Options{
		Development: true,
	}
	opts.BindFlags(flag.CommandLine)
	flag.Parse()

	ctrl.SetLogger(zap.New(zap.UseFlagOptions(&opts)))
	setupLog = setupLog.WithValues("api-export-name", apiExportName)

	ctx := ctrl.SetupSignalHandler()

	restConfig := ctrl.GetConfigOrDie()

	var mgr ctrl.Manager
	var err error

	if kcpAPIsGroupPresent(restConfig) {
		setupLog.Info("Looking up virtual workspace URL")
		cfg, err := restConfigForAPIExport(ctx, restConfig, apiExportName)
		if err != nil {
			setupLog.Error(err, "error looking up virtual workspace URL")
		}

		setupLog.Info("Using virtual workspace URL", "url", cfg.Host)
{% if not component_config %}
		mgr, err = kcp.NewClusterAwareManager(cfg, ctrl.Options{
			Scheme:                 scheme,
			MetricsBindAddress:     metricsAddr,
			Port:                   9443,
			HealthProbeBindAddress: probeAddr,
			LeaderElection:         enableLeaderElection,
			LeaderElectionID:       "{{ repo | hash_fnv }}.{{ domain }}",
			// LeaderElectionReleaseOnCancel defines if the leader should step down voluntarily
			// when the Manager ends. This requires the binary to immediately end when the
			// Manager is stopped, otherwise, this setting is unsafe. Setting this significantly
			// speeds up voluntary leader transitions as the new leader don't have to wait
			// LeaseDuration time first.
			// LeaderElectionReleaseOnCancel: true,
			LeaderElectionConfig: restConfig,
		})
{%- else %}
		options := ctrl.Options{Scheme: scheme}
		options.LeaderElectionConfig = restConfig
		if configFile != "" {
			options, err = options.AndFrom(ctrl.ConfigFile().AtPath(configFile))
			if err != nil {
				setupLog.Error(err, "unable to load the config file")
				os.Exit(1)
			}
		}

		mgr, err = kcp.NewClusterAwareManager(cfg, options)
{%- endif %}
		if err != nil {
			setupLog.Error(err, "unable to start cluster aware manager")
			os.Exit(1)
		}
	} else {
		setupLog.Info("The apis.kcp.dev group is not present - creating standard manager")
{% if not component_config %}
		mgr, err = ctrl.NewManager(restConfig, ctrl.Options{
			Scheme:                 scheme,
			MetricsBindAddress:     metricsAddr,
			Port:                   9443,
			HealthProbeBindAddress: probeAddr,
			LeaderElection:         enableLeaderElection,
			LeaderElectionID:       "{{ repo | hash_fnv }}.{{ domain }}",
		})
{%- else %}
		options := ctrl.Options{Scheme: scheme}
		if configFile != "" {
			options, err = options.AndFrom(ctrl.ConfigFile().AtPath(configFile))
			if err != nil {
				setupLog.Error(err, "unable to load the config file")
				os.Exit(1)
			}
		}

		mgr, err = ctrl.NewManager(restConfig, options)
{%- endif %}
		if err != nil {
			setupLog.Error(err, "unable to start manager")
			os.Exit(1)
		}
	}

	// +kubebuilder:scaffold:builder

	if err := mgr.AddHealthzCheck("healthz", healthz.Ping); err != nil {
		setupLog.Error(err, "unable to set up health check")
		os.Exit(1)
	}
	if err := mgr.AddReadyzCheck("readyz", healthz.Ping); err != nil {
		setupLog.Error(err, "unable to set up ready check")
		os.Exit(1)
	}

	setupLog.Info("starting manager")
	if err := mgr.Start(ctx); err != nil {
		setupLog.Error(err, "problem running manager")
		os.Exit(1)
	}
}

// +kubebuilder:rbac:groups="apis.kcp.dev",resources=apiexports,verbs=get;list;watch

// restConfigForAPIExport returns a *rest.Config properly configured to communicate with the endpoint for the
// APIExport's virtual workspace.
func restConfigForAPIExport(ctx context.Context, cfg *rest.Config, apiExportName string) (*rest.Config, error) {
	scheme := runtime.NewScheme()
	if err := apisv1alpha1.AddToScheme(scheme); err != nil {
		return nil, fmt.Errorf("error adding apis.kcp.dev/v1alpha1 to scheme: %w", err)
	}

	apiExportClient, err := client.New(cfg, client.Options{Scheme: scheme})
	if err != nil {
		return nil, fmt.Errorf("error creating APIExport client: %w", err)
	}

	var apiExport apisv1alpha1.APIExport

	if apiExportName != "" {
		if err := apiExportClient.Get(ctx, types.NamespacedName{Name: apiExportName}, &apiExport); err != nil {
			return nil, fmt.Errorf("error getting APIExport %q: %w", apiExportName, err)
		}
	} else {
		setupLog.Info("api-export-name is empty - listing")
		exports := &apisv1alpha1.APIExportList{}
		if err := apiExportClient.List(ctx, exports); err != nil {
			return nil, fmt.Errorf("error listing APIExports: %w", err)
		}
		if len(exports.Items) == 0 {
			return nil, fmt.Errorf("no APIExport found")
		}
		if len(exports.Items) > 1 {
			return nil, fmt.Errorf("more than one APIExport found")
		}
		apiExport = exports.Items[0]
	}

	if len(apiExport.Status.VirtualWorkspaces) < 1 {
		return nil, fmt.Errorf("APIExport %q status.virtualWorkspaces is empty", apiExportName)
	}

	cfg = rest.CopyConfig(cfg)
	cfg.Host = apiExport.Status.VirtualWorkspaces[0].URL

	return cfg, nil
}

func kcpAPIsGroupPresent(restConfig *rest.Config) bool {
	discoveryClient, err := discovery.NewDiscoveryClientForConfig(restConfig)
	if err != nil {
		setupLog.Error(err, "failed to create discovery client")
		os.Exit(1)
	}
	apiGroupList, err := discoveryClient.ServerGroups()
	if err != nil {
		setupLog.Error(err, "failed to get server groups")
		os.Exit(1)
	}

	for _, group := range apiGroupList.Groups {
		if group.Name == apisv1alpha1.SchemeGroupVersion.Group {
			for _, version := range group.Versions {
				if version.Version == apisv1alpha1.SchemeGroupVersion.Version {
					return true
				}
			}
		}
	}
	return false
}
"#;

const GO_MOD_TEMPLATE: &str = r#"module {{ repo }}

go 1.17

require (
	sigs.k8s.io/controller-runtime {{ controller_runtime_version }}
)

replace sigs.k8s.io/controller-runtime {{ controller_runtime_version }} => github.com/kcp-dev/controller-runtime v0.12.2-0.20221006162808-d4b60cec23b4
"#;

const GITIGNORE_TEMPLATE: &str = r#"
# Binaries for programs and plugins
*.exe
*.exe~
*.dll
*.so
*.dylib
bin
testbin/*
Dockerfile.cross

# Test binary, build with `go test -c`
*.test

# Output of the go coverage tool, specifically when used with LiteIDE
*.out

# Dependency directories
vendor/

# editor and IDE paraphernalia
.idea
*.swp
*.swo
*~
"#;

const DOCKERFILE_TEMPLATE: &str = r#"# Build the manager binary
FROM golang:1.19 as builder
ARG TARGETOS
ARG TARGETARCH

WORKDIR /workspace
# Copy the Go Modules manifests
COPY go.mod go.mod
COPY go.sum go.sum
# cache deps before building and copying source so that we don't need to re-download as much
# and so that source changes don't invalidate our downloaded layer
RUN go mod download

# Copy the go source
COPY main.go main.go
{% if multigroup -%}
COPY apis/ apis/
{%- else -%}
COPY api/ api/
{%- endif %}
COPY controllers/ controllers/

# Build
RUN CGO_ENABLED=0 GOOS=${TARGETOS:-linux} GOARCH=${TARGETARCH} go build -a -o manager main.go

# Use distroless as minimal base image to package the manager binary
# Refer to https://github.com/GoogleContainerTools/distroless for more details
FROM gcr.io/distroless/static:nonroot
WORKDIR /
COPY --from=builder /workspace/manager .
USER 65532:65532

ENTRYPOINT ["/manager"]
"#;

const DOCKERIGNORE_TEMPLATE: &str = r#"# More info: https://docs.docker.com/engine/reference/builder/#dockerignore-file
# Ignore build and test binaries.
bin/
testbin/
"#;

const README_TEMPLATE: &str = r#"# {{ project_name }}

// TODO(user): A simple overview of the project and its purpose.

## Description

// TODO(user): An in-depth paragraph providing more details about the project and its use.

## Getting Started

You'll need a Kubernetes and optionally a kcp cluster to run against. You can use [KIND](https://sigs.k8s.io/kind) to get a local cluster for testing, or run against a remote cluster.

**Note:** Your controller will automatically use the current context in your kubeconfig file (i.e. whatever cluster `kubectl cluster-info` shows).

### Running on Kubernetes or kcp

1. Build and push your image to the location specified by `REGISTRY` and `IMG`:

```sh
make docker-build docker-push REGISTRY=<some-registry> IMG={{ project_name }}:tag
```

2. Deploy the controller to the cluster with the image specified by `REGISTRY` and `IMG`:

```sh
make deploy REGISTRY=<some-registry> IMG={{ project_name }}:tag
```

### Uninstall resources

To delete the resources from the cluster:

```sh
make uninstall
```

### Undeploy controller

Undeploy the controller from the cluster:

```sh
make undeploy
```

## Contributing

// TODO(user): Add detailed information on how you would like others to contribute to this project.

### How it works

This project aims to follow the Kubernetes [Operator pattern](https://kubernetes.io/docs/concepts/extend-kubernetes/operator/)

It uses [Controllers](https://kubernetes.io/docs/concepts/architecture/controller/)
which provides a reconcile function responsible for synchronizing resources until the desired state is reached.

### Test It Out

1. Install the required resources into the cluster:

```sh
make install
```

2. Run your controller (this will run in the foreground, so switch to a new terminal if you want to leave it running):

```sh
make run
```

**NOTE:** You can also run this in one step by running: `make install run`

### Modifying the API definitions

If you are editing the API definitions, regenerate the manifests using:

```sh
make manifests apiresourceschemas
```

**NOTE:** Run `make --help` for more information on all potential `make` targets

More information can be found via the [Kubebuilder Documentation](https://book.kubebuilder.io/introduction.html)

## License

{{ license }}
"#;

const MAKEFILE_TEMPLATE: &str = r##"
##@ General

# The help target prints out all targets with their descriptions organized
# beneath their categories. The categories are represented by '##@' and the
# target descriptions by '##'. The awk commands is responsible for reading the
# entire set of makefiles included in this invocation, looking for lines of the
# file as xyz: ## something, and then pretty-format the target and help. Then,
# if there's a line with ##@ something, that gets pretty-printed as a category.
# More info on the usage of ANSI control characters for terminal formatting:
# https://en.wikipedia.org/wiki/ANSI_escape_code#SGR_parameters
# More info on the awk command:
# http://linuxcommand.org/lc3_adv_awk.php

.PHONY: help
help: ## Display this help.
	@awk 'BEGIN {FS = ":.*##"; printf "\nUsage:\n  make \033[36m<target>\033[0m\n"} /^[a-zA-Z_0-9-]+:.*?##/ { printf "  \033[36m%-15s\033[0m %s\n", $$1, $$2 } /^##@/ { printf "\n\033[1m%s\033[0m\n", substr($$0, 5) } ' $(MAKEFILE_LIST)

# Image registry and name used by all targets building/pushing images
REGISTRY ?= {{ registry }}
IMG ?= {{ image }}
# ENVTEST_K8S_VERSION refers to the version of kubebuilder assets to be downloaded by envtest binary.
ENVTEST_K8S_VERSION = {{ envtest_k8s }}

# Get the currently used golang install path (in GOPATH/bin, unless GOBIN is set)
ifeq (,$(shell go env GOBIN))
GOBIN=$(shell go env GOPATH)/bin
else
GOBIN=$(shell go env GOBIN)
endif

# Setting SHELL to bash allows bash commands to be executed by recipes.
# Options are set to exit when a recipe line exits non-zero or a piped command fails.
SHELL = /usr/bin/env bash -o pipefail
.SHELLFLAGS = -ec

# kcp specific
APIEXPORT_PREFIX ?= today

.PHONY: all
all: build

##@ Development

.PHONY: manifests
manifests: controller-gen ## Generate WebhookConfiguration, ClusterRole and CustomResourceDefinition objects.
	$(CONTROLLER_GEN) rbac:roleName=manager-role crd webhook paths="./..." output:crd:artifacts:config=config/crd/bases

.PHONY: apiresourceschemas
apiresourceschemas: $(KUSTOMIZE) ## Convert CRDs from config/crds to APIResourceSchemas. Specify APIEXPORT_PREFIX as needed.
	$(KUSTOMIZE) build config/crd | kubectl kcp crd snapshot -f - --prefix $(APIEXPORT_PREFIX) > config/kcp/$(APIEXPORT_PREFIX).apiresourceschemas.yaml

.PHONY: generate
generate: controller-gen ## Generate code containing DeepCopy, DeepCopyInto, and DeepCopyObject method implementations.
	$(CONTROLLER_GEN) object:headerFile="{{ boilerplate_path }}" paths="./..."

.PHONY: fmt
fmt: ## Run go fmt against code.
	go fmt ./...

.PHONY: vet
vet: ## Run go vet against code.
	go vet ./...

.PHONY: test
test: manifests generate fmt vet $(ENVTEST) ## Run tests.
	KUBEBUILDER_ASSETS="$(shell $(ENVTEST) use $(ENVTEST_K8S_VERSION) --bin-dir $(LOCALBIN) -p path)" go test ./... -coverprofile cover.out

ARTIFACT_DIR ?= .test

.PHONY: test-e2e
test-e2e: $(ARTIFACT_DIR)/kind.kubeconfig kcp-synctarget ready-deployment run-test-e2e ## Set up prerequisites and run end-to-end tests on a cluster.

.PHONY: run-test-e2e
run-test-e2e: ## Run end-to-end tests on a cluster.
	go test ./test/e2e/... --kubeconfig $(abspath $(ARTIFACT_DIR)/kcp.kubeconfig) --workspace $(shell $(KCP_KUBECTL) kcp workspace . --short)

.PHONY: ready-deployment
ready-deployment: KUBECONFIG = $(ARTIFACT_DIR)/kcp.kubeconfig
ready-deployment: kind-image install deploy apibinding ## Deploy the controller-manager and wait for it to be ready.
	$(KCP_KUBECTL) --namespace "{{ project_name }}-system" rollout status deployment/{{ project_name }}-controller-manager

.PHONY: apibinding
apibinding:
	$( eval WORKSPACE = $(shell $(KCP_KUBECTL) kcp workspace . --short) )
	sed 's/WORKSPACE/$(WORKSPACE)/' ./test/e2e/apibinding.yaml | $(KCP_KUBECTL) apply -f -
	$(KCP_KUBECTL) wait --for=condition=Ready apibinding/{{ project_name }}-{{ project_name }}.{{ domain }}

.PHONY: kind-image
kind-image: docker-build ## Load the controller-manager image into the kind cluster.
	kind load docker-image $(REGISTRY)/$(IMG) --name {{ project_name }}

$(ARTIFACT_DIR)/kind.kubeconfig: $(ARTIFACT_DIR) ## Run a kind cluster and generate a $KUBECONFIG for it.
	@if ! kind get clusters --quiet | grep --quiet {{ project_name }}; then kind create cluster --name {{ project_name }}; fi
	kind get kubeconfig --name {{ project_name }} > $(ARTIFACT_DIR)/kind.kubeconfig

$(ARTIFACT_DIR): ## Create a directory for test artifacts.
	mkdir -p $(ARTIFACT_DIR)

KCP_KUBECTL ?= PATH=$(LOCALBIN):$(PATH) KUBECONFIG=$(ARTIFACT_DIR)/kcp.kubeconfig kubectl
KIND_KUBECTL ?= kubectl --kubeconfig $(ARTIFACT_DIR)/kind.kubeconfig

.PHONY: kcp-synctarget
kcp-synctarget: kcp-workspace $(ARTIFACT_DIR)/syncer.yaml $(YQ) ## Add the kind cluster to kcp as a target for workloads.
	$(KIND_KUBECTL) apply -f $(ARTIFACT_DIR)/syncer.yaml
	$(eval DEPLOYMENT_NAME = $(shell $(YQ) 'select(.kind=="Deployment") | .metadata.name' < $(ARTIFACT_DIR)/syncer.yaml ))
	$(eval DEPLOYMENT_NAMESPACE = $(shell $(YQ) 'select(.kind=="Deployment") | .metadata.namespace' < $(ARTIFACT_DIR)/syncer.yaml ))
	$(KIND_KUBECTL) --namespace $(DEPLOYMENT_NAMESPACE) rollout status deployment/$(DEPLOYMENT_NAME)
	@if [[ ! -s $(ARTIFACT_DIR)/syncer.log ]]; then ( $(KIND_KUBECTL) --namespace $(DEPLOYMENT_NAMESPACE) logs deployment/$(DEPLOYMENT_NAME) -f >$(ARTIFACT_DIR)/syncer.log 2>&1 & ); fi
	$(KCP_KUBECTL) wait --for=condition=Ready synctarget/{{ project_name }}

$(ARTIFACT_DIR)/syncer.yaml: ## Create the SyncTarget and generate the manifests necessary to register the kind cluster with kcp.
	$(KCP_KUBECTL) kcp workload sync {{ project_name }} --resources services --syncer-image ghcr.io/kcp-dev/kcp/syncer:v$(KCP_VERSION) --output-file $(ARTIFACT_DIR)/syncer.yaml

.PHONY: kcp-workspace
kcp-workspace: $(KUBECTL_KCP) kcp-server ## Create a workspace in kcp for the controller-manager.
	$(KCP_KUBECTL) kcp workspace use '~'
	@if ! $(KCP_KUBECTL) kcp workspace use {{ project_name }}; then $(KCP_KUBECTL) kcp workspace create {{ project_name }} --type universal --enter; fi

.PHONY: kcp-server
kcp-server: $(KCP) $(ARTIFACT_DIR)/kcp ## Run the kcp server.
	@if [[ ! -s $(ARTIFACT_DIR)/kcp.log ]]; then ( $(KCP) start -v 5 --root-directory $(ARTIFACT_DIR)/kcp --kubeconfig-path $(ARTIFACT_DIR)/kcp.kubeconfig --audit-log-maxsize 1024 --audit-log-mode=batch --audit-log-batch-max-wait=1s --audit-log-batch-max-size=1000 --audit-log-batch-buffer-size=10000 --audit-log-batch-throttle-burst=15 --audit-log-batch-throttle-enable=true --audit-log-batch-throttle-qps=10 --audit-policy-file ./test/e2e/audit-policy.yaml --audit-log-path $(ARTIFACT_DIR)/audit.log >$(ARTIFACT_DIR)/kcp.log 2>&1 & ); fi
	@while true; do if [[ ! -s $(ARTIFACT_DIR)/kcp.kubeconfig ]]; then sleep 0.2; else break; fi; done
	@while true; do if ! kubectl --kubeconfig $(ARTIFACT_DIR)/kcp.kubeconfig get --raw /readyz >$(ARTIFACT_DIR)/kcp.probe.log 2>&1; then sleep 0.2; else break; fi; done

$(ARTIFACT_DIR)/kcp: ## Create a directory for the kcp server data.
	mkdir -p $(ARTIFACT_DIR)/kcp

.PHONY: test-e2e-cleanup
test-e2e-cleanup: ## Clean up processes and directories from an end-to-end test run.
	kind delete cluster --name {{ project_name }} || true
	rm -rf $(ARTIFACT_DIR) || true
	pkill -sigterm kcp || true
	pkill -sigterm kubectl || true

##@ Build

.PHONY: build
build: generate fmt vet ## Build manager binary.
	go build -o bin/manager main.go

NAME_PREFIX ?= {{ project_name }}
APIEXPORT_NAME ?= {{ domain }}

.PHONY: run
run: manifests generate fmt vet ## Run a controller from your host.
	go run ./main.go --api-export-name $(NAME_PREFIX)$(APIEXPORT_NAME)

.PHONY: docker-build
docker-build: test ## Build docker image with the manager.
	docker build -t ${REGISTRY}/${IMG} .

.PHONY: docker-push
docker-push: ## Push docker image with the manager.
	docker push ${REGISTRY}/${IMG}

# PLATFORMS defines the target platforms for the manager image being build to support multiple
# architectures. To use this option you need to be able to use docker buildx and have BuildKit enabled.
PLATFORMS ?= linux/arm64,linux/amd64,linux/s390x,linux/ppc64le
.PHONY: docker-buildx
docker-buildx: test ## Build and push docker image for the manager for cross-platform support
	sed -e '1 s/\(^FROM\)/FROM --platform=\$$\{BUILDPLATFORM\}/; t' -e ' 1,// s//FROM --platform=\$$\{BUILDPLATFORM\}/' Dockerfile > Dockerfile.cross
	- docker buildx create --name project-v3-builder
	docker buildx use project-v3-builder
	- docker buildx build --push --platform=$(PLATFORMS) --tag ${REGISTRY}/${IMG} -f Dockerfile.cross
	- docker buildx rm project-v3-builder
	rm Dockerfile.cross

##@ Deployment

ifndef ignore-not-found
  ignore-not-found = false
endif

.PHONY: install
install: manifests $(KUSTOMIZE) ## Install APIResourceSchemas and APIExport into kcp (using $KUBECONFIG or ~/.kube/config).
	$(KUSTOMIZE) build config/kcp | kubectl --kubeconfig $(KUBECONFIG) apply -f -

.PHONY: uninstall
uninstall: manifests $(KUSTOMIZE) ## Uninstall APIResourceSchemas and APIExport from kcp. Call with ignore-not-found=true to ignore resource not found errors during deletion.
	$(KUSTOMIZE) build config/kcp | kubectl --kubeconfig $(KUBECONFIG) delete --ignore-not-found=$(ignore-not-found) -f -

.PHONY: deploy
deploy: manifests $(KUSTOMIZE) ## Deploy controller
	cd config/manager && $(KUSTOMIZE) edit set image controller=${REGISTRY}/${IMG}
	$(KUSTOMIZE) build config/default | kubectl --kubeconfig $(KUBECONFIG) apply -f -

.PHONY: undeploy
undeploy: ## Undeploy controller. Call with ignore-not-found=true to ignore resource not found errors during deletion.
	$(KUSTOMIZE) build config/default | kubectl --kubeconfig $(KUBECONFIG) delete --ignore-not-found=$(ignore-not-found) -f -

##@ Build Dependencies

## Location to install dependencies to
LOCALBIN ?= $(shell pwd)/bin
$(LOCALBIN):
	mkdir -p $(LOCALBIN)

## Tool Binaries
KUSTOMIZE ?= $(LOCALBIN)/kustomize
CONTROLLER_GEN ?= $(LOCALBIN)/controller-gen
ENVTEST ?= $(LOCALBIN)/setup-envtest
KCP ?= $(LOCALBIN)/kcp
KUBECTL_KCP ?= $(LOCALBIN)/kubectl-kcp
YQ ?= $(LOCALBIN)/yq

## Tool Versions
KUSTOMIZE_VERSION ?= {{ kustomize_version }}
CONTROLLER_TOOLS_VERSION ?= {{ controller_tools_version }}
KCP_VERSION ?= {{ kcp_version }}
YQ_VERSION ?= {{ yq_version }}

KUSTOMIZE_INSTALL_SCRIPT ?= "https://raw.githubusercontent.com/kubernetes-sigs/kustomize/master/hack/install_kustomize.sh"
.PHONY: kustomize
kustomize: $(KUSTOMIZE) ## Download kustomize locally if necessary.
$(KUSTOMIZE): $(LOCALBIN)
	test -s $(LOCALBIN)/kustomize || { curl -Ss $(KUSTOMIZE_INSTALL_SCRIPT) | bash -s -- $(subst v,,$(KUSTOMIZE_VERSION)) $(LOCALBIN); }

.PHONY: controller-gen
controller-gen: $(CONTROLLER_GEN) ## Download controller-gen locally if necessary.
$(CONTROLLER_GEN): $(LOCALBIN)
	test -s $(LOCALBIN)/controller-gen || GOBIN=$(LOCALBIN) go install sigs.k8s.io/controller-tools/cmd/controller-gen@$(CONTROLLER_TOOLS_VERSION)

.PHONY: envtest
envtest: $(ENVTEST) ## Download envtest-setup locally if necessary.
$(ENVTEST): $(LOCALBIN)
	test -s $(LOCALBIN)/setup-envtest || GOBIN=$(LOCALBIN) go install sigs.k8s.io/controller-runtime/tools/setup-envtest@latest

.PHONY: yq
yq: $(YQ) ## Download yq locally if necessary.
$(YQ): $(LOCALBIN)
	GOBIN=$(LOCALBIN) go install github.com/mikefarah/yq/v4@$(YQ_VERSION)

OS ?= $(shell go env GOOS)
ARCH ?= $(shell go env GOARCH)

.PHONY: kcp
kcp: $(KCP) ## Download kcp locally if necessary.
$(KCP): $(LOCALBIN)
	curl -L -s -o - https://github.com/kcp-dev/kcp/releases/download/v$(KCP_VERSION)/kcp_$(KCP_VERSION)_$(OS)_$(ARCH).tar.gz | tar --directory $(LOCALBIN)/../ -xvzf - bin/kcp
	touch $(KCP)

.PHONY: kubectl_kcp
kubectl_kcp: $(KUBECTL_KCP) ## Download kcp kubectl plugins locally if necessary.
$(KUBECTL_KCP): $(LOCALBIN)
	curl -L -s -o - https://github.com/kcp-dev/kcp/releases/download/v$(KCP_VERSION)/kubectl-kcp-plugin_$(KCP_VERSION)_$(OS)_$(ARCH).tar.gz | tar --directory $(LOCALBIN)/../ -xvzf - bin
	touch $(KUBECTL_KCP)
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectConfig, Resource};

    fn ctx(multigroup: bool, resource: Resource) -> RenderingContext {
        let config = ProjectConfig::new("widgets", "example.com", "widgets").with_multigroup(multigroup);
        let path = config.api_package_path(&resource);
        RenderingContext::from_config(&config).with_resource(resource.with_path(path))
    }

    fn wire(updater: MainUpdater, ctx: &RenderingContext) -> FragmentMap {
        let file = updater.path().resolve(None).unwrap();
        updater.fragments(ctx, &file)
    }

    fn frags(map: &FragmentMap, marker: MainMarker) -> Vec<String> {
        map.get(&Marker::new(MAIN_PATH, marker))
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    #[test]
    fn main_updater_wires_resource_and_controller() {
        let map = wire(
            MainUpdater::new(true, true),
            &ctx(false, Resource::new("apps", "v1", "Widget")),
        );

        assert_eq!(
            frags(&map, MainMarker::Imports),
            [
                "appsv1 \"widgets/api/v1\"\n",
                "\"widgets/controllers\"\n"
            ]
        );
        assert_eq!(
            frags(&map, MainMarker::Scheme),
            ["utilruntime.Must(appsv1.AddToScheme(scheme))\n"]
        );
        let setup = frags(&map, MainMarker::Builder);
        assert_eq!(setup.len(), 1);
        assert!(setup[0].starts_with("if err = (&controllers.WidgetReconciler{\n"));
        assert!(setup[0].contains("\"controller\", \"Widget\")"));
    }

    #[test]
    fn main_updater_multigroup_uses_group_package() {
        let map = wire(
            MainUpdater::new(false, true),
            &ctx(true, Resource::new("apps", "v1", "Widget")),
        );

        assert_eq!(
            frags(&map, MainMarker::Imports),
            ["appscontrollers \"widgets/controllers/apps\"\n"]
        );
        assert!(frags(&map, MainMarker::Builder)[0].contains("&appscontrollers.WidgetReconciler{"));
        assert!(frags(&map, MainMarker::Scheme).is_empty());
    }

    #[test]
    fn main_updater_core_group_in_multigroup_uses_flat_controllers() {
        let map = wire(
            MainUpdater::new(false, true),
            &ctx(true, Resource::new("", "v1", "Pod")),
        );
        assert_eq!(
            frags(&map, MainMarker::Imports),
            ["\"widgets/controllers\"\n"]
        );
    }

    #[test]
    fn main_updater_without_resource_is_empty() {
        let config = ProjectConfig::new("widgets", "example.com", "widgets");
        let map = wire(
            MainUpdater::new(true, true),
            &RenderingContext::from_config(&config),
        );
        assert!(map.is_empty());
    }

    #[test]
    fn main_updater_declares_all_markers() {
        let file = MainUpdater::default().path().resolve(None).unwrap();
        let markers = MainUpdater::default().markers(&file);
        let labels: Vec<_> = markers.iter().map(Marker::label).collect();
        assert_eq!(labels, ["imports", "scheme", "builder"]);
        assert!(markers.iter().all(|m| m.file() == MAIN_PATH));
    }

    #[test]
    fn readme_strips_comment_delimiters() {
        let readme = Readme::new("/*\nCopyright 2026 Ada.\n*/");
        assert_eq!(
            readme.locals().get("license"),
            Some(&LocalValue::from("\nCopyright 2026 Ada.\n"))
        );
    }

    #[test]
    fn makefile_pins_kustomize_version() {
        let mk = Makefile::new(
            &ToolVersions::default(),
            KustomizeVersion::V4,
            "hack/boilerplate.go.txt",
        );
        let locals = mk.locals();
        assert_eq!(locals.get("kustomize_version"), Some(&LocalValue::from("v4.5.5")));
        assert_eq!(locals.get("kcp_version"), Some(&LocalValue::from("0.9.1")));
    }

    #[test]
    fn go_mod_defaults_to_error_if_exists() {
        assert_eq!(GoMod::new(&ToolVersions::default()).if_exists(), IfExistsAction::Error);
    }
}
