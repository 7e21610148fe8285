//! License header shared by every generated Go file.

use crate::domain::{License, Locals, PathPattern, Template, locals};

pub const BOILERPLATE_PATH: &str = "hack/boilerplate.go.txt";

/// `hack/boilerplate.go.txt`, the comment block prepended to Go sources.
#[derive(Debug, Clone)]
pub struct Boilerplate {
    license: License,
    owner: String,
    year: String,
}

impl Boilerplate {
    pub fn new(license: License, owner: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            license,
            owner: owner.into(),
            year: year.into(),
        }
    }

    fn license_text(&self) -> &'static str {
        match self.license {
            License::Apache2 => APACHE2_TEXT,
            License::None => "",
        }
    }
}

impl Template for Boilerplate {
    fn name(&self) -> &'static str {
        "boilerplate"
    }

    fn path(&self) -> PathPattern {
        PathPattern::new(BOILERPLATE_PATH)
    }

    fn body(&self) -> &'static str {
        BOILERPLATE_TEMPLATE
    }

    fn locals(&self) -> Locals {
        locals([
            ("owner", self.owner.as_str().into()),
            ("year", self.year.as_str().into()),
            ("license_text", self.license_text().into()),
        ])
    }
}

const BOILERPLATE_TEMPLATE: &str = "/*\n{% if owner %}Copyright {{ year }} {{ owner }}.{% else %}Copyright {{ year }}.{% endif %}\n{{ license_text }}*/";

const APACHE2_TEXT: &str = r#"
Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocalValue;

    #[test]
    fn apache_license_fills_text() {
        let bp = Boilerplate::new(License::Apache2, "Ada", "2026");
        let locals = bp.locals();
        match locals.get("license_text") {
            Some(LocalValue::Str(text)) => assert!(text.contains("Apache License")),
            other => panic!("unexpected license_text: {other:?}"),
        }
        assert_eq!(locals.get("owner"), Some(&LocalValue::from("Ada")));
    }

    #[test]
    fn no_license_leaves_text_empty() {
        let bp = Boilerplate::new(License::None, "", "2026");
        assert_eq!(bp.locals().get("license_text"), Some(&LocalValue::from("")));
    }

    #[test]
    fn needs_no_boilerplate_itself() {
        let bp = Boilerplate::new(License::None, "", "2026");
        assert!(bp.requires().is_empty());
        assert_eq!(bp.path().as_str(), BOILERPLATE_PATH);
    }
}
