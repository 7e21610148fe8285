//! API package files: the kind's Go types and the group-version registration.

use super::api_dir;
use crate::domain::{ContextField, IfExistsAction, Locals, PathPattern, Template, locals};

/// `<kind>_types.go`.
#[derive(Debug, Clone, Copy)]
pub struct Types {
    multigroup: bool,
    namespaced: bool,
}

impl Types {
    pub fn new(multigroup: bool, namespaced: bool) -> Self {
        Self {
            multigroup,
            namespaced,
        }
    }
}

impl Template for Types {
    fn name(&self) -> &'static str {
        "api-types"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new(format!("{}/%[kind]_types.go", api_dir(self.multigroup)))
    }

    fn body(&self) -> &'static str {
        TYPES_TEMPLATE
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::Boilerplate, ContextField::Resource]
    }

    fn locals(&self) -> Locals {
        locals([("namespaced", self.namespaced.into())])
    }
}

/// `groupversion_info.go`, shared by every kind of a group-version.
#[derive(Debug, Clone, Copy)]
pub struct Group {
    multigroup: bool,
}

impl Group {
    pub fn new(multigroup: bool) -> Self {
        Self { multigroup }
    }
}

impl Template for Group {
    fn name(&self) -> &'static str {
        "api-group"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new(format!(
            "{}/groupversion_info.go",
            api_dir(self.multigroup)
        ))
    }

    fn body(&self) -> &'static str {
        GROUP_TEMPLATE
    }

    fn if_exists(&self) -> IfExistsAction {
        IfExistsAction::Skip
    }

    fn requires(&self) -> &'static [ContextField] {
        &[ContextField::Boilerplate, ContextField::Resource]
    }
}

const TYPES_TEMPLATE: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
)

// EDIT THIS FILE!  THIS IS SCAFFOLDING FOR YOU TO OWN!
// NOTE: json tags are required.  Any new fields you add must have json tags for the fields to be serialized.

// {{ resource.kind }}Spec defines the desired state of {{ resource.kind }}
type {{ resource.kind }}Spec struct {
	// INSERT ADDITIONAL SPEC FIELDS - desired state of cluster
	// Important: Run "make" to regenerate code after modifying this file

	// Foo is an example field of {{ resource.kind }}. Edit {{ resource.kind | lower }}_types.go to remove/update
	Foo string `json:"foo,omitempty"`
}

// {{ resource.kind }}Status defines the observed state of {{ resource.kind }}
type {{ resource.kind }}Status struct {
	// INSERT ADDITIONAL STATUS FIELD - define observed state of cluster
	// Important: Run "make" to regenerate code after modifying this file
}

//+kubebuilder:object:root=true
//+kubebuilder:subresource:status
{%- if not namespaced %}
//+kubebuilder:resource:scope=Cluster
{%- endif %}

// {{ resource.kind }} is the Schema for the {{ resource.plural }} API
type {{ resource.kind }} struct {
	metav1.TypeMeta   `json:",inline"`
	metav1.ObjectMeta `json:"metadata,omitempty"`

	Spec   {{ resource.kind }}Spec   `json:"spec,omitempty"`
	Status {{ resource.kind }}Status `json:"status,omitempty"`
}

//+kubebuilder:object:root=true

// {{ resource.kind }}List contains a list of {{ resource.kind }}
type {{ resource.kind }}List struct {
	metav1.TypeMeta `json:",inline"`
	metav1.ListMeta `json:"metadata,omitempty"`
	Items           []{{ resource.kind }} `json:"items"`
}

func init() {
	SchemeBuilder.Register(&{{ resource.kind }}{}, &{{ resource.kind }}List{})
}
"#;

const GROUP_TEMPLATE: &str = r#"{{ boilerplate }}

// Package {{ resource.version }} contains API Schema definitions for the {{ resource.group }} {{ resource.version }} API group
//+kubebuilder:object:generate=true
//+groupName={{ resource.qualified_group }}
package {{ resource.version }}

import (
	"k8s.io/apimachinery/pkg/runtime/schema"
	"sigs.k8s.io/controller-runtime/pkg/scheme"
)

var (
	// GroupVersion is group version used to register these objects
	GroupVersion = schema.GroupVersion{Group: "{{ resource.qualified_group }}", Version: "{{ resource.version }}"}

	// SchemeBuilder is used to add go types to the GroupVersionKind scheme
	SchemeBuilder = &scheme.Builder{GroupVersion: GroupVersion}

	// AddToScheme adds the types in this group-version to the given scheme.
	AddToScheme = SchemeBuilder.AddToScheme
)
"#;
