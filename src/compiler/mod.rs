//! Name-tree compiler.
//!
//! # Data Flow
//! ```text
//! RouteRecord[] (filtered, input order)
//!     → split names on '.'
//!     → pseudonym.rs (optional keyed digest per segment)
//!     → tree.rs (build NameTree, last-wins on duplicate names)
//!     → NameMap (original name → pseudonymized path)
//!     → emit.rs (render client module from template)
//!     → obfuscate.rs (optional external pass, seeded)
//! ```
//!
//! # Design Decisions
//! - The pseudonymizer is injected; the compiler never sees the secret
//! - A name that is both a route and a route group is an error, not an overwrite
//! - Ordered maps everywhere so the same input renders byte-identical output

pub mod emit;
pub mod obfuscate;
pub mod pseudonym;
pub mod tree;

use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::routes::RouteRecord;
pub use pseudonym::{HmacPseudonymizer, Pseudonymizer};
pub use tree::{NameTree, TreeError};

/// Original dotted name → dot-joined pseudonymized segments.
pub type NameMap = BTreeMap<String, String>;

/// Errors that abort tree construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Empty segment (leading, trailing or doubled dot).
    #[error("route name {0:?} contains an empty segment")]
    InvalidName(String),

    /// `path` is used both as a route and as a prefix of other route names.
    #[error("route {name:?} collides with route group {path:?}")]
    SegmentCollision { name: String, path: String },

    /// Two different segments produced the same pseudonym.
    #[error("segments {first:?} and {second:?} share pseudonym {pseudonym}")]
    PseudonymCollision {
        first: String,
        second: String,
        pseudonym: String,
    },
}

/// Result of compiling one route set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compilation {
    pub tree: NameTree,
    /// Empty unless pseudonymization was active.
    pub name_map: NameMap,
}

impl Compilation {
    /// Number of leaves in the tree.
    pub fn route_count(&self) -> usize {
        self.tree.leaves().len()
    }

    /// Dotted key path for `name` as stored in the tree.
    pub fn key_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.name_map.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Build the name tree for `routes`, pseudonymizing segments when a
/// pseudonymizer is supplied.
pub fn compile(
    routes: &[RouteRecord],
    pseudonymizer: Option<&dyn Pseudonymizer>,
) -> Result<Compilation, CompileError> {
    let mut compilation = Compilation::default();
    let mut seen: HashMap<String, String> = HashMap::new();

    for route in routes {
        let segments: Vec<&str> = route.name.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(CompileError::InvalidName(route.name.clone()));
        }

        let keys: Vec<String> = match pseudonymizer {
            Some(p) => segments
                .iter()
                .map(|segment| {
                    let pseudonym = p.pseudonym(segment);
                    match seen.get(&pseudonym) {
                        Some(first) if first != segment => Err(CompileError::PseudonymCollision {
                            first: first.clone(),
                            second: segment.to_string(),
                            pseudonym,
                        }),
                        Some(_) => Ok(pseudonym),
                        None => {
                            seen.insert(pseudonym.clone(), segment.to_string());
                            Ok(pseudonym)
                        }
                    }
                })
                .collect::<Result<_, _>>()?,
            None => segments.iter().map(|s| s.to_string()).collect(),
        };

        match compilation.tree.insert(keys.as_slice(), &route.pattern) {
            Ok(Some(previous)) => tracing::warn!(
                name = %route.name,
                previous = %previous,
                pattern = %route.pattern,
                "Duplicate route name, last definition wins"
            ),
            Ok(None) => {}
            Err(TreeError::Collision { depth }) => {
                return Err(CompileError::SegmentCollision {
                    name: route.name.clone(),
                    path: segments[..=depth].join("."),
                })
            }
            Err(TreeError::EmptyPath) => return Err(CompileError::InvalidName(route.name.clone())),
        }

        if pseudonymizer.is_some() {
            compilation.name_map.insert(route.name.clone(), keys.join("."));
        }
    }

    Ok(compilation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(segment: &str) -> String {
        format!("h{}", segment.len())
    }

    fn reversed(segment: &str) -> String {
        segment.chars().rev().collect()
    }

    #[test]
    fn test_plain_compile() {
        let routes = vec![
            RouteRecord::new("users.show", "/users/:id"),
            RouteRecord::new("users.index", "/users"),
            RouteRecord::new("home", "/"),
        ];
        let compilation = compile(&routes, None).unwrap();
        assert_eq!(compilation.tree.lookup(&["users", "show"]), Some("/users/:id"));
        assert_eq!(compilation.tree.lookup(&["home"]), Some("/"));
        assert!(compilation.name_map.is_empty());
        assert_eq!(compilation.route_count(), 3);
    }

    #[test]
    fn test_pseudonymized_compile() {
        let routes = vec![
            RouteRecord::new("users.show", "/users/:id"),
            RouteRecord::new("admin.users.show", "/admin/users/:id"),
        ];
        let p = reversed;
        let compilation = compile(&routes, Some(&p)).unwrap();

        assert_eq!(compilation.tree.lookup(&["sresu", "wohs"]), Some("/users/:id"));
        assert_eq!(
            compilation.tree.lookup(&["nimda", "sresu", "wohs"]),
            Some("/admin/users/:id")
        );
        assert_eq!(compilation.tree.lookup(&["users", "show"]), None);
        assert_eq!(compilation.name_map["users.show"], "sresu.wohs");
        assert_eq!(compilation.name_map["admin.users.show"], "nimda.sresu.wohs");
        assert_eq!(compilation.key_for("users.show"), "sresu.wohs");
        assert_eq!(compilation.key_for("unknown"), "unknown");
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let routes = vec![
            RouteRecord::new("users.show", "/old/:id"),
            RouteRecord::new("users.show", "/users/:id"),
        ];
        let compilation = compile(&routes, None).unwrap();
        assert_eq!(compilation.tree.lookup(&["users", "show"]), Some("/users/:id"));
    }

    #[test]
    fn test_segment_collision_reports_original_names() {
        let routes = vec![
            RouteRecord::new("users", "/users"),
            RouteRecord::new("users.show", "/users/:id"),
        ];
        let p = reversed;
        let err = compile(&routes, Some(&p)).unwrap_err();
        assert_eq!(
            err,
            CompileError::SegmentCollision {
                name: "users.show".into(),
                path: "users".into(),
            }
        );
    }

    #[test]
    fn test_invalid_names() {
        for name in ["users..show", ".users", "users.", ""] {
            let err = compile(&[RouteRecord::new(name, "/")], None).unwrap_err();
            assert_eq!(err, CompileError::InvalidName(name.to_string()));
        }
    }

    #[test]
    fn test_pseudonym_collision_detected() {
        // "ab" and "cd" both map to "h2".
        let routes = vec![RouteRecord::new("ab", "/ab"), RouteRecord::new("cd", "/cd")];
        let p = stub;
        let err = compile(&routes, Some(&p)).unwrap_err();
        assert!(matches!(err, CompileError::PseudonymCollision { .. }));
    }

    #[test]
    fn test_empty_input() {
        let compilation = compile(&[], None).unwrap();
        assert!(compilation.tree.is_empty());
        assert!(compilation.name_map.is_empty());
    }
}
