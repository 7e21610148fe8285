//! Domain value objects: License, plugin keys, tool version pins.
//!
//! These are plain value types with no identity. Anything that depends on the
//! plugin chain is computed here from explicit inputs, never stored globally.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Plugin keys ──────────────────────────────────────────────────────────────

/// Key of the Go base plugin that owns the project layout.
pub const GO_PLUGIN_KEY: &str = "base.go.kcp.dev/v3";

/// Key of the plugin that adds the kcp kustomize overlays.
pub const MANIFESTS_PLUGIN_KEY: &str = "manifests.kcp.dev/v1";

/// Kustomize common plugin, v1 (kustomize v3 binary).
pub const KUSTOMIZE_V1_PLUGIN_KEY: &str = "kustomize.common.kubebuilder.io/v1";

/// Kustomize common plugin, v2-alpha (kustomize v4 binary).
pub const KUSTOMIZE_V2_ALPHA_PLUGIN_KEY: &str = "kustomize.common.kubebuilder.io/v2-alpha";

/// Plugin chain recorded for projects initialised without `--plugins`.
pub fn default_plugin_chain() -> Vec<String> {
    vec![
        KUSTOMIZE_V1_PLUGIN_KEY.to_string(),
        GO_PLUGIN_KEY.to_string(),
        MANIFESTS_PLUGIN_KEY.to_string(),
    ]
}

// ── License ──────────────────────────────────────────────────────────────────

/// License used for the boilerplate header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum License {
    #[default]
    Apache2,
    None,
}

impl License {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Apache2 => "apache2",
            Self::None => "none",
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for License {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apache2" | "apache-2.0" | "apache" => Ok(Self::Apache2),
            "none" | "" => Ok(Self::None),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown license: {other}"
            ))),
        }
    }
}

// ── KustomizeVersion ─────────────────────────────────────────────────────────

/// Kustomize binary version pinned in the generated Makefile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KustomizeVersion {
    V3,
    V4,
}

impl KustomizeVersion {
    /// Pick the kustomize version matching the kustomize plugin in the chain.
    pub fn for_plugin_chain<S: AsRef<str>>(chain: &[S]) -> Self {
        if chain
            .iter()
            .any(|key| key.as_ref() == KUSTOMIZE_V2_ALPHA_PLUGIN_KEY)
        {
            Self::V4
        } else {
            Self::V3
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V3 => "v3.8.7",
            Self::V4 => "v4.5.5",
        }
    }
}

impl fmt::Display for KustomizeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ToolVersions ─────────────────────────────────────────────────────────────

/// Versions and image coordinates written into build recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersions {
    pub controller_runtime: String,
    pub controller_tools: String,
    pub kcp: String,
    pub yq: String,
    pub envtest_k8s: String,
    pub registry: String,
    pub image: String,
}

impl Default for ToolVersions {
    fn default() -> Self {
        Self {
            controller_runtime: "v0.11.2".into(),
            controller_tools: "v0.10.0".into(),
            kcp: "0.9.1".into(),
            yq: "v4.27.2".into(),
            envtest_k8s: "1.25".into(),
            registry: "localhost".into(),
            image: "controller:0.1".into(),
        }
    }
}
