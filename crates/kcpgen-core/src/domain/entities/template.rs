//! Template and updater abstractions.
//!
//! A [`Template`] owns one output file: it knows its path pattern, its body
//! and what to do when the file is already there. An [`Updater`] never
//! creates a file; it names the markers it touches in a file some earlier
//! template produced and computes the fragments to weave in.
//!
//! Catalogue entries are plain structs built by constructors, each listing
//! exactly the fields its body needs. Those fields reach the renderer as
//! [`Locals`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::context::{ContextField, RenderingContext};
use super::marker::{FragmentMap, Marker};
use crate::domain::{DomainError, RelativePath, Resource};

// ── Conflict policy ──────────────────────────────────────────────────────────

/// What to do when a create-template's output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IfExistsAction {
    /// Leave the existing file alone.
    Skip,
    /// Report a conflict and leave the existing file alone.
    #[default]
    Error,
    /// Replace the existing file.
    Overwrite,
}

impl IfExistsAction {
    /// Apply a user `--force`: `Error` becomes `Overwrite`, nothing else moves.
    pub fn promote(self, force: bool) -> Self {
        match self {
            Self::Error if force => Self::Overwrite,
            other => other,
        }
    }
}

impl fmt::Display for IfExistsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Error => "error",
            Self::Overwrite => "overwrite",
        })
    }
}

// ── Path patterns ────────────────────────────────────────────────────────────

const PLACEHOLDER_OPEN: &str = "%[";

/// Output path with optional `%[...]` placeholders.
///
/// Known placeholders: `group`, `version`, `kind` (lower-cased) and `plural`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern(Cow<'static, str>);

impl PathPattern {
    pub fn new(pattern: impl Into<Cow<'static, str>>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn has_placeholders(&self) -> bool {
        self.0.contains(PLACEHOLDER_OPEN)
    }

    /// Substitute every placeholder from `resource` and validate the result.
    ///
    /// A pattern without placeholders resolves to itself, so resolving an
    /// already resolved path is a no-op.
    pub fn resolve(&self, resource: Option<&Resource>) -> Result<RelativePath, DomainError> {
        let mut out = String::with_capacity(self.0.len());
        let mut rest: &str = &self.0;

        while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + PLACEHOLDER_OPEN.len()..];
            let Some(end) = after.find(']') else {
                return Err(self.unresolved(&rest[start..], "unterminated placeholder"));
            };
            let name = &after[..end];
            let Some(resource) = resource else {
                return Err(self.unresolved(name, "no resource in context"));
            };
            let value = match name {
                "group" => resource.group.clone(),
                "version" => resource.version.clone(),
                "kind" => resource.kind.to_lowercase(),
                "plural" => resource.plural(),
                _ => return Err(self.unresolved(name, "unknown placeholder")),
            };
            out.push_str(&value);
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        // An empty group leaves `a//b` behind; collapse it.
        let cleaned = out
            .split('/')
            .filter(|seg| !seg.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        RelativePath::try_new(if out.starts_with('/') {
            format!("/{cleaned}")
        } else {
            cleaned
        })
    }

    fn unresolved(&self, placeholder: &str, reason: &'static str) -> DomainError {
        DomainError::UnresolvedPlaceholder {
            path: self.0.to_string(),
            placeholder: placeholder.to_string(),
            reason,
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for PathPattern {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PathPattern {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// ── Locals ───────────────────────────────────────────────────────────────────

/// Template-specific value rendered alongside the shared context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocalValue {
    Str(String),
    Bool(bool),
}

impl From<&str> for LocalValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for LocalValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for LocalValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Per-template fields, keyed by the name the body refers to.
pub type Locals = BTreeMap<&'static str, LocalValue>;

// ── Traits ───────────────────────────────────────────────────────────────────

/// A unit that produces one file.
pub trait Template: fmt::Debug {
    /// Stable name used in logs and reports.
    fn name(&self) -> &'static str;

    fn path(&self) -> PathPattern;

    /// Body in the renderer's expression language.
    fn body(&self) -> &'static str;

    fn if_exists(&self) -> IfExistsAction {
        IfExistsAction::Error
    }

    /// Context fields the body cannot render without.
    fn requires(&self) -> &'static [ContextField] {
        &[]
    }

    fn locals(&self) -> Locals {
        Locals::new()
    }
}

/// A unit that weaves fragments into an existing file at named markers.
pub trait Updater: fmt::Debug {
    fn name(&self) -> &'static str;

    fn path(&self) -> PathPattern;

    /// Every marker this updater may touch in `file`, the resolved
    /// [`path`](Self::path). Each must exist in the file.
    fn markers(&self, file: &RelativePath) -> Vec<Marker>;

    /// Fragments to insert into `file` for this run. Markers with nothing to
    /// add are absent.
    fn fragments(&self, ctx: &RenderingContext, file: &RelativePath) -> FragmentMap;
}

/// Convenience for building [`Locals`] from pairs.
pub fn locals<const N: usize>(pairs: [(&'static str, LocalValue); N]) -> Locals {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Resource {
        Resource::new("apps", "v1", "Widget")
    }

    #[test]
    fn promote_only_moves_error() {
        assert_eq!(IfExistsAction::Error.promote(true), IfExistsAction::Overwrite);
        assert_eq!(IfExistsAction::Error.promote(false), IfExistsAction::Error);
        assert_eq!(IfExistsAction::Skip.promote(true), IfExistsAction::Skip);
        assert_eq!(
            IfExistsAction::Overwrite.promote(false),
            IfExistsAction::Overwrite
        );
    }

    #[test]
    fn resolves_resource_placeholders() {
        let p = PathPattern::new("controllers/%[group]/%[kind]_controller.go");
        let resolved = p.resolve(Some(&widget())).unwrap();
        assert_eq!(resolved.to_string(), "controllers/apps/widget_controller.go");

        let p = PathPattern::new("config/samples/%[group]_%[version]_%[plural].yaml");
        assert_eq!(
            p.resolve(Some(&widget())).unwrap().to_string(),
            "config/samples/apps_v1_widgets.yaml"
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let p = PathPattern::new("apis/%[group]/%[version]/%[kind]_types.go");
        let first = p.resolve(Some(&widget())).unwrap();
        let second = p.resolve(Some(&widget())).unwrap();
        assert_eq!(first, second);

        let again = PathPattern::new(first.to_string())
            .resolve(Some(&widget()))
            .unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn empty_group_collapses_segment() {
        let core = Resource::new("", "v1", "Pod");
        let p = PathPattern::new("apis/%[group]/%[version]/groupversion_info.go");
        assert_eq!(
            p.resolve(Some(&core)).unwrap().to_string(),
            "apis/v1/groupversion_info.go"
        );
    }

    #[test]
    fn unknown_placeholder_fails() {
        let p = PathPattern::new("x/%[flavour]/y.go");
        let err = p.resolve(Some(&widget())).unwrap_err();
        assert!(matches!(
            err,
            DomainError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "flavour"
        ));
    }

    #[test]
    fn placeholder_without_resource_fails() {
        let p = PathPattern::new("api/%[version]/x.go");
        assert!(matches!(
            p.resolve(None),
            Err(DomainError::UnresolvedPlaceholder { .. })
        ));
    }

    #[test]
    fn static_path_needs_no_resource() {
        let p = PathPattern::new("main.go");
        assert!(!p.has_placeholders());
        assert_eq!(p.resolve(None).unwrap().to_string(), "main.go");
    }

    #[test]
    fn absolute_and_escaping_results_rejected() {
        assert!(PathPattern::new("/etc/%[kind]").resolve(Some(&widget())).is_err());
        assert!(PathPattern::new("../%[kind].go").resolve(Some(&widget())).is_err());
    }

    #[test]
    fn unterminated_placeholder_fails() {
        assert!(PathPattern::new("api/%[version").resolve(Some(&widget())).is_err());
    }
}
