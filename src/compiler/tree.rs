//! Nested name tree.
//!
//! A route name `a.b.c` becomes the path `["a", "b", "c"]`: interior
//! segments are [`NameTree::Node`]s and the last segment holds the
//! [`NameTree::Leaf`] pattern.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structural conflicts detected while inserting into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The key at `depth` already has the other value type
    /// (a pattern where a subtree is needed, or vice versa).
    #[error("segment {depth} is both a route and a route group")]
    Collision { depth: usize },

    #[error("empty path")]
    EmptyPath,
}

/// Either a URL pattern or a mapping of segment to subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NameTree {
    Leaf(String),
    Node(BTreeMap<String, NameTree>),
}

impl Default for NameTree {
    fn default() -> Self {
        NameTree::Node(BTreeMap::new())
    }
}

impl NameTree {
    /// An empty root node.
    pub fn new() -> Self {
        Self::default()
    }

    /// True for a node without children.
    pub fn is_empty(&self) -> bool {
        matches!(self, NameTree::Node(children) if children.is_empty())
    }

    /// Set the leaf at `path` to `pattern`, creating intermediate nodes.
    ///
    /// Returns the pattern previously stored at exactly that path, if any.
    pub fn insert<S: AsRef<str>>(
        &mut self,
        path: &[S],
        pattern: &str,
    ) -> Result<Option<String>, TreeError> {
        let (last, parents) = path.split_last().ok_or(TreeError::EmptyPath)?;

        let mut children = match self {
            NameTree::Node(children) => children,
            NameTree::Leaf(_) => return Err(TreeError::Collision { depth: 0 }),
        };

        for (depth, segment) in parents.iter().enumerate() {
            let entry = children
                .entry(segment.as_ref().to_string())
                .or_insert_with(NameTree::new);
            children = match entry {
                NameTree::Node(next) => next,
                NameTree::Leaf(_) => return Err(TreeError::Collision { depth }),
            };
        }

        if let Some(NameTree::Node(_)) = children.get(last.as_ref()) {
            return Err(TreeError::Collision {
                depth: parents.len(),
            });
        }

        let previous = children.insert(
            last.as_ref().to_string(),
            NameTree::Leaf(pattern.to_string()),
        );
        Ok(match previous {
            Some(NameTree::Leaf(previous)) => Some(previous),
            _ => None,
        })
    }

    /// Walk `path` segment by segment.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&NameTree> {
        path.iter().try_fold(self, |node, segment| match node {
            NameTree::Node(children) => children.get(segment.as_ref()),
            NameTree::Leaf(_) => None,
        })
    }

    /// The pattern stored at `path`, if `path` ends on a leaf.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        match self.get(path)? {
            NameTree::Leaf(pattern) => Some(pattern.as_str()),
            NameTree::Node(_) => None,
        }
    }

    /// Every leaf as `(dotted key path, pattern)`, in key order.
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<&'a str>, out: &mut Vec<(String, &'a str)>) {
        match self {
            NameTree::Leaf(pattern) => out.push((prefix.join("."), pattern.as_str())),
            NameTree::Node(children) => {
                for (key, child) in children {
                    prefix.push(key);
                    child.collect_leaves(prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}
