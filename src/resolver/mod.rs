//! Native counterpart of the emitted `route()` / `current()` functions.
//!
//! # Responsibilities
//! - Resolve a dotted name against a compiled tree
//! - Substitute `:param` placeholders and append a query string
//! - Test a name against an active navigation path
//!
//! # Design Decisions
//! - Same rules as the generated module, so `chimera resolve` previews
//!   exactly what the client will produce
//! - Unknown names are reported, never panicked on
//! - Path parameters are inserted verbatim, query values are form-encoded

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

use crate::compiler::NameTree;

/// Path parameters keyed by placeholder name.
pub type Params = BTreeMap<String, String>;

/// Query entries in caller order. `None` values are skipped.
pub type Query = Vec<(String, Option<String>)>;

/// Lookup failures. The client module logs these and returns `""`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("route {0:?} is not defined")]
    UnknownRoute(String),

    #[error("{0:?} names a route group, not a route")]
    NotALeaf(String),
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+)").expect("valid placeholder regex"))
}

/// The pattern stored under `name`.
pub fn lookup<'a>(tree: &'a NameTree, name: &str) -> Result<&'a str, ResolveError> {
    let segments: Vec<&str> = name.split('.').collect();
    match tree.get(segments.as_slice()) {
        Some(NameTree::Leaf(pattern)) => Ok(pattern.as_str()),
        Some(NameTree::Node(_)) => Err(ResolveError::NotALeaf(name.to_string())),
        None => Err(ResolveError::UnknownRoute(name.to_string())),
    }
}

/// Build the URL for `name`.
pub fn route(
    tree: &NameTree,
    name: &str,
    params: &Params,
    query: &Query,
) -> Result<String, ResolveError> {
    let pattern = lookup(tree, name)?;

    let mut url = placeholder()
        .replace_all(pattern, |caps: &Captures| {
            params
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;
    for (key, value) in query {
        if let Some(value) = value {
            serializer.append_pair(key, value);
            has_query = true;
        }
    }
    if has_query {
        url.push('?');
        url.push_str(&serializer.finish());
    }

    Ok(url)
}

/// Anchored matcher for `pattern`: literals escaped, each `:param` matches one path segment.
pub fn matcher(pattern: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(pattern);
    let source = placeholder().replace_all(&escaped, "([^/]+)");
    Regex::new(&format!("^{}$", source))
}

/// Whether `name` matches the active navigation path.
///
/// `params` pins placeholders to concrete values; placeholders left unset
/// match any single path segment. `None` models an environment without
/// navigation (server-side rendering, workers), which is never "current".
pub fn current(tree: &NameTree, name: &str, params: &Params, active_path: Option<&str>) -> bool {
    let Some(active_path) = active_path else {
        return false;
    };
    let Ok(pattern) = route(tree, name, params, &Query::new()) else {
        return false;
    };
    matcher(&pattern)
        .map(|re| re.is_match(active_path))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> NameTree {
        let mut tree = NameTree::new();
        tree.insert(&["users", "show"], "/users/:id").unwrap();
        tree.insert(&["posts", "comment"], "/posts/:post/comments/:comment").unwrap();
        tree.insert(&["files"], "/files/v1.0/:name").unwrap();
        tree.insert(&["home"], "/").unwrap();
        tree
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_route_substitutes_params() {
        let url = route(&tree(), "users.show", &params(&[("id", "7")]), &Query::new()).unwrap();
        assert_eq!(url, "/users/7");

        let url = route(
            &tree(),
            "posts.comment",
            &params(&[("post", "3"), ("comment", "9")]),
            &Query::new(),
        )
        .unwrap();
        assert_eq!(url, "/posts/3/comments/9");
    }

    #[test]
    fn test_route_appends_query() {
        let query = vec![
            ("tab".to_string(), Some("info".to_string())),
            ("skip".to_string(), None),
        ];
        let url = route(&tree(), "users.show", &params(&[("id", "7")]), &query).unwrap();
        assert_eq!(url, "/users/7?tab=info");
    }

    #[test]
    fn test_query_is_form_encoded() {
        let query = vec![("q".to_string(), Some("a b&c".to_string()))];
        let url = route(&tree(), "home", &Params::new(), &query).unwrap();
        assert_eq!(url, "/?q=a+b%26c");
    }

    #[test]
    fn test_path_params_are_not_encoded() {
        let url = route(&tree(), "users.show", &params(&[("id", "a b")]), &Query::new()).unwrap();
        assert_eq!(url, "/users/a b");
    }

    #[test]
    fn test_missing_param_left_in_place() {
        let url = route(&tree(), "users.show", &Params::new(), &Query::new()).unwrap();
        assert_eq!(url, "/users/:id");
    }

    #[test]
    fn test_unknown_route() {
        assert_eq!(
            route(&tree(), "missing.name", &Params::new(), &Query::new()),
            Err(ResolveError::UnknownRoute("missing.name".into()))
        );
        assert_eq!(
            route(&tree(), "users", &Params::new(), &Query::new()),
            Err(ResolveError::NotALeaf("users".into()))
        );
    }

    #[test]
    fn test_current() {
        let tree = tree();
        let none = Params::new();
        assert!(current(&tree, "users.show", &none, Some("/users/7")));
        assert!(current(&tree, "users.show", &none, Some("/users/8")));
        assert!(!current(&tree, "users.show", &none, Some("/users/7/edit")));
        assert!(!current(&tree, "users.show", &none, Some("/users/")));
        assert!(!current(&tree, "users.show", &none, None));
        assert!(!current(&tree, "missing", &none, Some("/users/7")));
        assert!(current(&tree, "home", &none, Some("/")));
    }

    #[test]
    fn test_current_with_pinned_params() {
        let tree = tree();
        let seven = params(&[("id", "7")]);
        assert!(current(&tree, "users.show", &seven, Some("/users/7")));
        assert!(!current(&tree, "users.show", &seven, Some("/users/8")));
        assert!(!current(&tree, "users.show", &seven, None));
    }

    #[test]
    fn test_current_escapes_literals() {
        let tree = tree();
        let none = Params::new();
        assert!(current(&tree, "files", &none, Some("/files/v1.0/readme")));
        assert!(!current(&tree, "files", &none, Some("/files/v1x0/readme")));
    }

    #[test]
    fn test_matcher_source() {
        let re = matcher("/users/:id").unwrap();
        assert_eq!(re.as_str(), "^/users/([^/]+)$");
    }
}
