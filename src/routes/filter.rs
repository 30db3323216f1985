//! Route filtering logic.
//!
//! # Responsibilities
//! - Keyword match against name, pattern and handler identifier
//! - Middleware inclusion list (`*` = has any middleware)
//! - Middleware exclusion list (`*` = has no middleware)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Keyword matching is a case-sensitive substring test
//! - Empty condition = always matches (wildcard)
//! - No regex, filters are plain string comparisons

use crate::routes::record::RouteRecord;

/// Middleware sentinel meaning "any middleware at all".
pub const WILDCARD: &str = "*";

/// Trait for matching routes against operator-supplied conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the route passes this condition.
    fn matches(&self, route: &RouteRecord) -> bool;
}

/// Substring match on name, pattern or handler display identifier.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
}

impl KeywordMatcher {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }
}

impl Matcher for KeywordMatcher {
    fn matches(&self, route: &RouteRecord) -> bool {
        route.name.contains(&self.keyword)
            || route.pattern.contains(&self.keyword)
            || route.handler_display().contains(&self.keyword)
    }
}

/// Requires every listed middleware to be attached.
#[derive(Debug, Clone)]
pub struct MiddlewareMatcher {
    required: Vec<String>,
}

impl MiddlewareMatcher {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }
}

impl Matcher for MiddlewareMatcher {
    fn matches(&self, route: &RouteRecord) -> bool {
        self.required.iter().all(|name| {
            if name == WILDCARD {
                !route.middleware.is_empty()
            } else {
                route.middleware.iter().any(|m| m == name)
            }
        })
    }
}

/// Rejects routes carrying any listed middleware.
#[derive(Debug, Clone)]
pub struct IgnoreMiddlewareMatcher {
    excluded: Vec<String>,
}

impl IgnoreMiddlewareMatcher {
    pub fn new(excluded: Vec<String>) -> Self {
        Self { excluded }
    }
}

impl Matcher for IgnoreMiddlewareMatcher {
    fn matches(&self, route: &RouteRecord) -> bool {
        self.excluded.iter().all(|name| {
            if name == WILDCARD {
                route.middleware.is_empty()
            } else {
                !route.middleware.iter().any(|m| m == name)
            }
        })
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug, Default)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Number of active conditions.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, route: &RouteRecord) -> bool {
        self.matchers.iter().all(|m| m.matches(route))
    }
}

/// Filter flags as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// `--match`
    pub keyword: Option<String>,
    /// `--middleware`
    pub middleware: Vec<String>,
    /// `--ignore-middleware`
    pub ignore_middleware: Vec<String>,
}

impl FilterOptions {
    /// Compile the active options into a single matcher.
    pub fn matcher(&self) -> AndMatcher {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();

        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            matchers.push(Box::new(KeywordMatcher::new(keyword)));
        }
        if !self.middleware.is_empty() {
            matchers.push(Box::new(MiddlewareMatcher::new(self.middleware.clone())));
        }
        if !self.ignore_middleware.is_empty() {
            matchers.push(Box::new(IgnoreMiddlewareMatcher::new(
                self.ignore_middleware.clone(),
            )));
        }

        AndMatcher::new(matchers)
    }
}
