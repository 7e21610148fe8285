//! Tera-backed renderer.
//!
//! Each body is compiled on its own, against the rendering context plus the
//! template's locals. Autoescaping is off: the output is Go, YAML and
//! Makefiles, not HTML.

use std::collections::HashMap;
use std::error::Error as _;
use std::path::Path;

use kcpgen_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{Locals, RenderingContext, hash_fnv},
};
use tera::{Context, Tera, Value};
use tracing::{instrument, trace};

/// Renders template bodies with Tera and a `hash_fnv` filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeraRenderer;

impl TeraRenderer {
    pub fn new() -> Self {
        Self
    }

    fn engine(name: &str, body: &str) -> tera::Result<Tera> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("hash_fnv", hash_fnv_filter);
        tera.add_raw_template(name, body)?;
        Ok(tera)
    }
}

fn hash_fnv_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("hash_fnv", "value", String, value);
    Ok(Value::String(hash_fnv(&text)))
}

/// Tera nests the useful message in the source chain.
fn describe(err: &tera::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        source = inner.source();
    }
    msg
}

impl TemplateRenderer for TeraRenderer {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn render(
        &self,
        path: &Path,
        body: &str,
        ctx: &RenderingContext,
        locals: &Locals,
    ) -> Result<String, ApplicationError> {
        let failed = |err: tera::Error| ApplicationError::RenderingFailed {
            path: path.to_path_buf(),
            reason: describe(&err),
        };

        let name = path.to_string_lossy();
        let tera = Self::engine(&name, body).map_err(failed)?;

        let mut context = Context::from_serialize(ctx).map_err(failed)?;
        for (key, value) in locals {
            context.insert(*key, value);
        }

        let out = tera.render(&name, &context).map_err(failed)?;
        trace!(bytes = out.len(), "Rendered");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcpgen_core::domain::{LocalValue, ProjectConfig, Resource, locals};

    fn ctx() -> RenderingContext {
        let config = ProjectConfig::new("widgets", "example.com", "widgets");
        RenderingContext::from_config(&config)
            .with_boilerplate("/* header */")
            .with_resource(Resource::new("apps", "v1", "Widget").with_path("widgets/api/v1"))
    }

    fn render(body: &str, locals: &Locals) -> Result<String, ApplicationError> {
        TeraRenderer::new().render(Path::new("x.go"), body, &ctx(), locals)
    }

    #[test]
    fn renders_context_and_resource_fields() {
        let out = render(
            "{{ boilerplate }}\npackage {{ resource.version }}\n// {{ resource.import_alias }} {{ resource.plural }}\n",
            &Locals::new(),
        )
        .unwrap();
        assert_eq!(out, "/* header */\npackage v1\n// appsv1 widgets\n");
    }

    #[test]
    fn hash_filter_matches_domain_hash() {
        let out = render("{{ repo | hash_fnv }}", &Locals::new()).unwrap();
        assert_eq!(out, hash_fnv("widgets"));
    }

    #[test]
    fn locals_are_top_level() {
        let locals = locals([
            ("kcp_version", LocalValue::from("0.9.1")),
            ("namespaced", LocalValue::from(false)),
        ]);
        let out = render(
            "kcp {{ kcp_version }}{% if not namespaced %} cluster{% endif %}",
            &locals,
        )
        .unwrap();
        assert_eq!(out, "kcp 0.9.1 cluster");
    }

    #[test]
    fn no_html_escaping() {
        let out = render("{{ resource.path }} \"&\" <x>", &Locals::new()).unwrap();
        assert_eq!(out, "widgets/api/v1 \"&\" <x>");
    }

    #[test]
    fn malformed_body_is_rendering_error() {
        let err = render("{% if %}", &Locals::new()).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::RenderingFailed { ref path, .. } if path == Path::new("x.go")
        ));
    }

    #[test]
    fn unknown_variable_is_rendering_error() {
        let err = render("{{ nope }}", &Locals::new()).unwrap_err();
        assert!(matches!(err, ApplicationError::RenderingFailed { .. }));
    }
}
