//! Client module rendering.
//!
//! The artifact is a template with three placeholders substituted by JSON
//! literals. The built-in template ships inside the binary; a custom one can
//! be configured as long as it keeps the routes placeholder.

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

use crate::compiler::Compilation;

/// Replaced by the name tree literal.
pub const ROUTES_PLACEHOLDER: &str = "__CHIMERA_ROUTES__";

/// Replaced by the name map literal.
pub const NAME_MAP_PLACEHOLDER: &str = "__CHIMERA_NAME_MAP__";

/// Replaced by the client-visible obfuscate flag.
pub const OBFUSCATE_PLACEHOLDER: &str = "__CHIMERA_OBFUSCATE__";

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/chimera.ts");

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"__CHIMERA_(ROUTES|NAME_MAP|OBFUSCATE)__").expect("valid placeholder regex")
    })
}

/// Errors raised while loading or rendering the template.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("cannot read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("template {0} has no __CHIMERA_ROUTES__ placeholder")]
    MissingPlaceholder(String),

    #[error("failed to serialize route data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A module template.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Template {
    /// The template compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            source: BUILTIN_TEMPLATE.to_string(),
        }
    }

    /// Wrap template text, checking that the routes placeholder is present.
    pub fn from_source(name: &str, source: impl Into<String>) -> Result<Self, EmitError> {
        let source = source.into();
        if !source.contains(ROUTES_PLACEHOLDER) {
            return Err(EmitError::MissingPlaceholder(name.to_string()));
        }
        Ok(Self { source })
    }

    /// Read a custom template from disk.
    pub async fn load(path: &Path) -> Result<Self, EmitError> {
        let label = path.display().to_string();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| EmitError::Read {
                path: label.clone(),
                source,
            })?;
        Self::from_source(&label, source)
    }

    /// Render the module for `compilation`.
    ///
    /// Output is a pure function of the compilation: no timestamps, sorted keys.
    /// Placeholders are substituted in one pass over the template, so tokens
    /// inside route data are never expanded.
    pub fn render(&self, compilation: &Compilation) -> Result<String, EmitError> {
        let routes = serde_json::to_string_pretty(&compilation.tree)?;
        let name_map = serde_json::to_string_pretty(&compilation.name_map)?;

        let rendered = placeholder().replace_all(&self.source, |caps: &Captures| match &caps[1] {
            "ROUTES" => routes.clone(),
            "NAME_MAP" => name_map.clone(),
            _ => "false".to_string(),
        });
        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::routes::RouteRecord;

    fn compilation() -> Compilation {
        compile(
            &[
                RouteRecord::new("users.show", "/users/:id"),
                RouteRecord::new("home", "/"),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_template_has_placeholders() {
        assert!(BUILTIN_TEMPLATE.contains(ROUTES_PLACEHOLDER));
        assert!(BUILTIN_TEMPLATE.contains(NAME_MAP_PLACEHOLDER));
        assert!(BUILTIN_TEMPLATE.contains(OBFUSCATE_PLACEHOLDER));
    }

    #[test]
    fn test_render_builtin() {
        let out = Template::builtin().render(&compilation()).unwrap();
        assert!(!out.contains("__CHIMERA_"));
        assert!(out.contains("\"show\": \"/users/:id\""));
        assert!(out.contains("const nameMap: Record<string, string> = {};"));
        assert!(out.contains("obfuscate: false,"));
        assert!(out.contains("export default chimera;"));
        assert!(out.contains("function route("));
        assert!(out.contains("function current("));
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = Template::builtin();
        assert_eq!(
            template.render(&compilation()).unwrap(),
            template.render(&compilation()).unwrap()
        );
    }

    #[test]
    fn test_render_empty() {
        let out = Template::builtin().render(&Compilation::default()).unwrap();
        assert!(out.contains("const routes: RouteTree = {};"));
    }

    #[test]
    fn test_custom_template() {
        let template = Template::from_source(
            "inline",
            "export const routes = __CHIMERA_ROUTES__;\nexport const names = __CHIMERA_NAME_MAP__;",
        )
        .unwrap();
        let out = template.render(&Compilation::default()).unwrap();
        assert_eq!(out, "export const routes = {};\nexport const names = {};");
    }

    #[test]
    fn test_placeholder_tokens_in_route_data_are_kept() {
        let compilation = compile(
            &[
                RouteRecord::new("docs", "/docs/__CHIMERA_OBFUSCATE__"),
                RouteRecord::new("maps", "/maps/__CHIMERA_NAME_MAP__/__CHIMERA_ROUTES__"),
            ],
            None,
        )
        .unwrap();
        let out = Template::builtin().render(&compilation).unwrap();

        assert!(out.contains("\"docs\": \"/docs/__CHIMERA_OBFUSCATE__\""));
        assert!(out.contains("\"maps\": \"/maps/__CHIMERA_NAME_MAP__/__CHIMERA_ROUTES__\""));
        assert!(out.contains("obfuscate: false,"));
        assert!(out.contains("const nameMap: Record<string, string> = {};"));
    }

    #[test]
    fn test_custom_template_requires_routes_placeholder() {
        let err = Template::from_source("broken.ts", "export default {};").unwrap_err();
        assert!(matches!(err, EmitError::MissingPlaceholder(_)));
    }

    #[tokio::test]
    async fn test_load_missing_template() {
        let err = Template::load(Path::new("/no/such/template.ts")).await.unwrap_err();
        assert!(matches!(err, EmitError::Read { .. }));
    }
}
