//! Route manifest ingestion.
//!
//! The host router exports its routes as JSON. Three shapes are accepted:
//! a bare array, `{"routes": [...]}`, or an object keyed by domain whose
//! values are arrays (flattened in document order).

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::routes::record::{Handler, RouteRecord, ANONYMOUS_CLOSURE};

/// Errors raised while reading the route manifest.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid route manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid routes for domain {domain:?}: {source}")]
    Domain {
        domain: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("route manifest must be an array or an object, got {0}")]
    Shape(&'static str),
}

/// Where the manifest is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(PathBuf),
    Stdin,
}

impl ManifestSource {
    /// `-` selects stdin, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ManifestSource::Stdin
        } else {
            ManifestSource::File(PathBuf::from(arg))
        }
    }

    fn label(&self) -> String {
        match self {
            ManifestSource::File(path) => path.display().to_string(),
            ManifestSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Read and parse the manifest.
    pub async fn load(&self) -> Result<Vec<RawRoute>, SourceError> {
        let content = match self {
            ManifestSource::File(path) => tokio::fs::read_to_string(path).await,
            ManifestSource::Stdin => {
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await.map(|_| buf)
            }
        }
        .map_err(|source| SourceError::Io {
            path: self.label(),
            source,
        })?;

        let routes = parse_manifest(&content)?;
        tracing::debug!(source = %self.label(), routes = routes.len(), "Route manifest loaded");
        Ok(routes)
    }
}

/// A route as exported by the host router, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    name: Option<String>,

    #[serde(alias = "uri", alias = "path")]
    pattern: String,

    #[serde(default)]
    methods: Vec<String>,

    #[serde(default)]
    method: Option<String>,

    #[serde(default)]
    middleware: Vec<String>,

    #[serde(default)]
    handler: Option<RawHandler>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawHandler {
    Reference(String),
    Detailed(RawHandlerObject),
}

#[derive(Debug, Clone, Deserialize)]
struct RawHandlerObject {
    #[serde(default, alias = "type")]
    kind: Option<String>,
    #[serde(default, alias = "reference")]
    module: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

impl RawRoute {
    /// Normalize into a [`RouteRecord`]. Unnamed routes yield `None`.
    pub fn into_record(self) -> Option<RouteRecord> {
        let name = self.name.filter(|name| !name.is_empty())?;

        let mut methods: Vec<String> = self
            .methods
            .into_iter()
            .chain(self.method)
            .map(|m| m.to_ascii_uppercase())
            .collect();
        methods.dedup();

        let handler = self.handler.map(RawHandler::normalize).unwrap_or_else(Handler::closure);

        Some(RouteRecord {
            name,
            pattern: self.pattern,
            methods,
            middleware: self.middleware,
            handler,
        })
    }
}

impl RawHandler {
    fn normalize(self) -> Handler {
        match self {
            RawHandler::Reference(reference) => {
                let split = split_reference(&reference)
                    .map(|(module, method)| Handler::controller(module, method));
                split.unwrap_or_else(|| Handler::Closure {
                    name: reference,
                    args: Vec::new(),
                })
            }
            RawHandler::Detailed(obj) => {
                let is_controller = match obj.kind.as_deref() {
                    Some(kind) => kind.eq_ignore_ascii_case("controller"),
                    None => obj.module.is_some(),
                };
                if is_controller {
                    let module = obj.module.unwrap_or_default();
                    if let Some(method) = obj.method {
                        return Handler::controller(module, method);
                    }
                    let split = split_reference(&module)
                        .map(|(module, method)| Handler::controller(module, method));
                    split.unwrap_or_else(|| Handler::controller(module, "handle"))
                } else {
                    Handler::Closure {
                        name: obj
                            .name
                            .filter(|name| !name.is_empty())
                            .unwrap_or_else(|| ANONYMOUS_CLOSURE.to_string()),
                        args: obj.args,
                    }
                }
            }
        }
    }
}

/// Split `Module.method` / `Module@method` on the last separator.
fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let idx = reference.rfind(['@', '.'])?;
    let (module, method) = (&reference[..idx], &reference[idx + 1..]);
    if module.is_empty() || method.is_empty() {
        return None;
    }
    Some((module, method))
}

/// Parse a manifest document into raw routes, preserving document order.
pub fn parse_manifest(content: &str) -> Result<Vec<RawRoute>, SourceError> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => {
            if map.get("routes").is_some_and(Value::is_array) {
                let routes = map.remove("routes").unwrap_or_default();
                return Ok(serde_json::from_value(routes)?);
            }
            let mut routes = Vec::new();
            for (domain, entries) in map {
                let mut batch: Vec<RawRoute> = serde_json::from_value(entries)
                    .map_err(|source| SourceError::Domain { domain, source })?;
                routes.append(&mut batch);
            }
            Ok(routes)
        }
        Value::Null => Err(SourceError::Shape("null")),
        Value::Bool(_) => Err(SourceError::Shape("a boolean")),
        Value::Number(_) => Err(SourceError::Shape("a number")),
        Value::String(_) => Err(SourceError::Shape("a string")),
    }
}
