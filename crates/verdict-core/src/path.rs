//! # Structural Field Paths
//!
//! Validators recurse through configuration trees and must report where
//! a constraint failed. [`FieldPath`] accumulates key and index segments
//! during descent and renders them once at the reporting edge, e.g.
//! `ref.map[0][1]` or `rules[2].validate`.

use std::fmt;

use serde::{Serialize, Serializer};

/// One step in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A record key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// Ordered path from the configuration root to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, addressing the configuration root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend with a record key, returning the longer path.
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.into()));
        Self { segments }
    }

    /// Extend with a sequence index, returning the longer path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Whether this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path segments in root-to-leaf order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(FieldPath::root().to_string(), "(root)");
    }

    #[test]
    fn test_nested_display() {
        let path = FieldPath::root().key("ref").key("map").index(0).index(1);
        assert_eq!(path.to_string(), "ref.map[0][1]");
    }

    #[test]
    fn test_key_after_index() {
        let path = FieldPath::root().key("rules").index(2).key("validate");
        assert_eq!(path.to_string(), "rules[2].validate");
    }

    #[test]
    fn test_extension_does_not_mutate() {
        let base = FieldPath::root().key("flags");
        let _child = base.key("default");
        assert_eq!(base.to_string(), "flags");
    }
}
