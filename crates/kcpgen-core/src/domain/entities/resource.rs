//! API resource descriptor (group/version/kind plus scaffolding flags).
//!
//! The same shape is used for the resource being scaffolded and for the
//! resources recorded in the PROJECT file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// An API resource identified by its GVK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    pub version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,
    /// Go import path of the API package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub api: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub namespaced: bool,
    #[serde(default)]
    pub controller: bool,
}

impl Resource {
    /// A bare GVK with neither API nor controller requested.
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            domain: String::new(),
            plural: None,
            path: None,
            api: false,
            namespaced: false,
            controller: false,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_api(mut self, namespaced: bool) -> Self {
        self.api = true;
        self.namespaced = namespaced;
        self
    }

    pub fn with_controller(mut self, controller: bool) -> Self {
        self.controller = controller;
        self
    }

    pub fn has_api(&self) -> bool {
        self.api
    }

    pub fn has_controller(&self) -> bool {
        self.controller
    }

    /// True when none of group, version or kind is set.
    pub fn is_empty_gvk(&self) -> bool {
        self.group.is_empty() && self.version.is_empty() && self.kind.is_empty()
    }

    pub fn same_gvk(&self, other: &Resource) -> bool {
        self.group == other.group
            && self.version == other.version
            && self.kind == other.kind
            && self.domain == other.domain
    }

    /// Plural resource name, explicit or derived from the kind.
    pub fn plural(&self) -> String {
        match &self.plural {
            Some(p) if !p.is_empty() => p.clone(),
            _ => pluralize(&self.kind.to_lowercase()),
        }
    }

    /// `group.domain`, or whichever of the two is set.
    pub fn qualified_group(&self) -> String {
        match (self.group.is_empty(), self.domain.is_empty()) {
            (false, false) => format!("{}.{}", self.group, self.domain),
            (false, true) => self.group.clone(),
            (true, _) => self.domain.clone(),
        }
    }

    /// Go package name for the group; `core` for the core group.
    pub fn package_name(&self) -> String {
        if self.group.is_empty() {
            "core".to_string()
        } else {
            safe_import(&self.group)
        }
    }

    /// Import alias for the API package, e.g. `appsv1`.
    pub fn import_alias(&self) -> String {
        if self.group.is_empty() {
            format!("core{}", safe_import(&self.version))
        } else {
            safe_import(&format!("{}{}", self.group, self.version))
        }
    }

    /// Fold the flags of another record for the same GVK into this one.
    pub fn merge(&mut self, other: &Resource) {
        self.api |= other.api;
        self.namespaced |= other.namespaced;
        self.controller |= other.controller;
        if other.path.is_some() {
            self.path = other.path.clone();
        }
        if other.plural.is_some() {
            self.plural = other.plural.clone();
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.version.is_empty() {
            return Err(DomainError::InvalidResource("version cannot be empty".into()));
        }
        if self.kind.is_empty() {
            return Err(DomainError::InvalidResource("kind cannot be empty".into()));
        }
        if !is_valid_version(&self.version) {
            return Err(DomainError::InvalidResource(format!(
                "version '{}' must look like v1, v1alpha1 or v1beta1",
                self.version
            )));
        }
        if !is_valid_kind(&self.kind) {
            return Err(DomainError::InvalidResource(format!(
                "kind '{}' must be PascalCase alphanumerics",
                self.kind
            )));
        }
        if !self.group.is_empty() && !is_dns_subdomain(&self.group) {
            return Err(DomainError::InvalidResource(format!(
                "group '{}' must be a lowercase DNS subdomain",
                self.group
            )));
        }

        let fields = [
            Some(self.group.as_str()),
            Some(self.domain.as_str()),
            self.plural.as_deref(),
            self.path.as_deref(),
        ];
        if fields.into_iter().flatten().any(|v| v.contains("%[")) {
            return Err(DomainError::InvalidResource(
                "values may not contain a '%[' placeholder".into(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = self.qualified_group();
        if group.is_empty() {
            write!(f, "{}, Kind={}", self.version, self.kind)
        } else {
            write!(f, "{}/{}, Kind={}", group, self.version, self.kind)
        }
    }
}

fn safe_import(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

fn is_valid_version(v: &str) -> bool {
    let Some(rest) = v.strip_prefix('v') else {
        return false;
    };
    let major_len = rest.chars().take_while(char::is_ascii_digit).count();
    if major_len == 0 || rest.starts_with('0') {
        return false;
    }
    let tail = &rest[major_len..];
    if tail.is_empty() {
        return true;
    }
    let Some(num) = tail
        .strip_prefix("alpha")
        .or_else(|| tail.strip_prefix("beta"))
    else {
        return false;
    };
    !num.is_empty() && num.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_kind(k: &str) -> bool {
    let mut chars = k.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

fn is_dns_subdomain(g: &str) -> bool {
    g.len() <= 253
        && g.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        })
}

/// English pluralisation good enough for Kubernetes kinds.
pub fn pluralize(word: &str) -> String {
    const IRREGULAR: &[(&str, &str)] = &[
        ("person", "people"),
        ("child", "children"),
        ("endpoints", "endpoints"),
        ("policy", "policies"),
    ];
    if let Some((_, plural)) = IRREGULAR.iter().find(|(s, _)| *s == word) {
        return (*plural).to_string();
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if matches!(before, Some(c) if !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Resource {
        Resource::new("apps", "v1", "Widget").with_domain("example.com")
    }

    #[test]
    fn derived_names() {
        let r = widget();
        assert_eq!(r.qualified_group(), "apps.example.com");
        assert_eq!(r.package_name(), "apps");
        assert_eq!(r.import_alias(), "appsv1");
        assert_eq!(r.plural(), "widgets");
    }

    #[test]
    fn core_group_names() {
        let r = Resource::new("", "v1", "Pod");
        assert_eq!(r.package_name(), "core");
        assert_eq!(r.import_alias(), "corev1");
    }

    #[test]
    fn import_alias_strips_separators() {
        let r = Resource::new("my-group.sub", "v1beta1", "Thing");
        assert_eq!(r.import_alias(), "mygroupsubv1beta1");
        assert_eq!(r.package_name(), "mygroupsub");
    }

    #[test]
    fn pluralisation_rules() {
        assert_eq!(pluralize("widget"), "widgets");
        assert_eq!(pluralize("ingress"), "ingresses");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("batch"), "batches");
        assert_eq!(pluralize("gateway"), "gateways");
        assert_eq!(pluralize("proxy"), "proxies");
        assert_eq!(pluralize("policy"), "policies");
    }

    #[test]
    fn explicit_plural_wins() {
        let r = widget().with_plural("widgetz");
        assert_eq!(r.plural(), "widgetz");
    }

    #[test]
    fn validation_accepts_common_versions() {
        for v in ["v1", "v2", "v1alpha1", "v2beta3", "v10"] {
            let r = Resource::new("apps", v, "Widget");
            assert!(r.validate().is_ok(), "{v} should be valid");
        }
    }

    #[test]
    fn validation_rejects_bad_input() {
        assert!(Resource::new("apps", "1", "Widget").validate().is_err());
        assert!(Resource::new("apps", "v1gamma1", "Widget").validate().is_err());
        assert!(Resource::new("apps", "v0", "Widget").validate().is_err());
        assert!(Resource::new("apps", "v1", "widget").validate().is_err());
        assert!(Resource::new("Apps", "v1", "Widget").validate().is_err());
        assert!(Resource::new("apps", "", "Widget").validate().is_err());
        assert!(
            Resource::new("apps", "v1", "Widget")
                .with_plural("%[kind]s")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn merge_ors_flags() {
        let mut recorded = widget().with_api(true);
        recorded.merge(&widget().with_controller(true));
        assert!(recorded.has_api());
        assert!(recorded.has_controller());
        assert!(recorded.namespaced);
    }

    #[test]
    fn display_is_gvk() {
        assert_eq!(widget().to_string(), "apps.example.com/v1, Kind=Widget");
    }
}
