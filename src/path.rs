//! Delimiter-separated paths
//!
//! The same addressing scheme locates variables inside the variables section
//! and insertion points inside the output tree.

use smallvec::SmallVec;
use std::fmt;

/// A path split into its intermediate segments and the final key
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    /// Segments leading to the container that holds `key`, outermost first
    pub segments: SmallVec<[String; 4]>,
    /// Final key looked up in (or inserted into) the terminal container
    pub key: String,
}

impl Path {
    /// Splits `path` on `delimiter`.
    ///
    /// A single leading delimiter is stripped first. The last element becomes
    /// the key; everything before it becomes the segments. An empty delimiter
    /// never splits, so the whole input is the key.
    pub fn split(path: &str, delimiter: &str) -> Self {
        if delimiter.is_empty() {
            return Self {
                segments: SmallVec::new(),
                key: path.to_string(),
            };
        }

        let path = path.strip_prefix(delimiter).unwrap_or(path);
        let mut segments: SmallVec<[String; 4]> =
            path.split(delimiter).map(str::to_string).collect();
        // str::split always yields at least one element
        let key = segments.pop().unwrap_or_default();

        Self { segments, key }
    }

    /// Joins segments and key back into a path string
    pub fn join(&self, delimiter: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(segment);
            out.push_str(delimiter);
        }
        out.push_str(&self.key);
        out
    }

    /// Number of segments before the key
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments and an empty key
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.key.is_empty()
    }

    /// Iterates every component, segments first and the key last
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.key.as_str()))
    }
}

/// Appends a child name (object key or array index) to a parent path
pub fn child_path(parent: &str, delimiter: &str, child: impl fmt::Display) -> String {
    format!("{parent}{delimiter}{child}")
}
