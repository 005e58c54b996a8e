//! Node paths
//!
//! Provides [`NodePath`] for addressing nodes by the names of their ancestors.

use crate::error::SceneError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path from a root to a node
///
/// # Examples
/// - `["root", "childA", "childB"]` → `root/childA/childB`
/// - `/root/childA` parses to the same path as `root/childA`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Separator between segments
    pub const SEPARATOR: char = '/';

    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Empty path, addressing the root set itself
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (node depth + 1)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path (if not root)
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Last segment, i.e. the node's own name
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path extended by one segment
    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    #[inline]
    pub(crate) fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// Whether `self` is `other` or one of its ancestors
    #[must_use]
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }
}

impl FromStr for NodePath {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix(Self::SEPARATOR).unwrap_or(trimmed);
        let body = body.strip_suffix(Self::SEPARATOR).unwrap_or(body);

        if body.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in body.split(Self::SEPARATOR) {
            if segment.is_empty() {
                return Err(SceneError::InvalidPath {
                    path: s.to_string(),
                    reason: "empty segment".to_string(),
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self(segments))
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_leading_and_trailing_separator() {
        let a: NodePath = "root/childA/childB".parse().unwrap();
        let b: NodePath = "/root/childA/childB/".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.to_string(), "root/childA/childB");
    }

    #[test]
    fn parse_rejects_empty_segment() {
        assert!("root//child".parse::<NodePath>().is_err());
    }

    #[test]
    fn slash_is_root() {
        assert!("/".parse::<NodePath>().unwrap().is_empty());
    }

    #[test]
    fn parent_and_last() {
        let p: NodePath = "a/b/c".parse().unwrap();
        assert_eq!(p.last(), Some("c"));
        assert_eq!(p.parent().unwrap().to_string(), "a/b");
        assert!(NodePath::root().parent().is_none());
    }

    #[test]
    fn prefix() {
        let a: NodePath = "a/b".parse().unwrap();
        let b: NodePath = "a/b/c".parse().unwrap();
        assert!(a.is_prefix_of(&b));
        assert!(!b.is_prefix_of(&a));
    }
}
