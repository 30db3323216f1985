//! Normalized route records.

use serde::Serialize;
use std::fmt;

/// Handler name used for anonymous closures.
pub const ANONYMOUS_CLOSURE: &str = "Closure";

/// The endpoint a route dispatches to. Display and filter metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Handler {
    /// A controller method.
    Controller { module: String, method: String },
    /// An inline closure.
    Closure {
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
    },
}

impl Handler {
    /// Anonymous closure handler.
    pub fn closure() -> Self {
        Handler::Closure {
            name: ANONYMOUS_CLOSURE.to_string(),
            args: Vec::new(),
        }
    }

    /// Controller handler.
    pub fn controller(module: impl Into<String>, method: impl Into<String>) -> Self {
        Handler::Controller {
            module: module.into(),
            method: method.into(),
        }
    }
}

/// `Module.method` for controllers, the closure name otherwise.
impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Controller { module, method } => write!(f, "{}.{}", module, method),
            Handler::Closure { name, .. } => f.write_str(name),
        }
    }
}

/// One named route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    /// Dot-delimited hierarchical name, e.g. `users.show`.
    pub name: String,

    /// URL template with `:param` placeholders.
    pub pattern: String,

    /// HTTP verbs, upper-cased.
    pub methods: Vec<String>,

    /// Middleware identifiers in registration order.
    pub middleware: Vec<String>,

    pub handler: Handler,
}

impl RouteRecord {
    /// A `GET` route with no middleware and an anonymous closure handler.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            methods: vec!["GET".to_string()],
            middleware: Vec::new(),
            handler: Handler::closure(),
        }
    }

    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware = middleware.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = handler;
        self
    }

    /// Identifier used by the keyword filter and the route table.
    pub fn handler_display(&self) -> String {
        self.handler.to_string()
    }
}
