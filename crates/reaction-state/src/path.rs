//! Concrete locations inside a state tree.
//!
//! A [`Path`] names one node by its sequence of keys and indices. Paths are
//! what the diff engine reports and what runtime errors carry; declaration
//! paths that may contain predicates live in [`crate::slice`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single step of a concrete path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Mapping property.
    Key(String),
    /// Array position.
    Index(usize),
}

impl Seg {
    /// Get the key if this is a key segment.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Seg::Key(k) => Some(k),
            Seg::Index(_) => None,
        }
    }

    /// Get the index if this is an index segment.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Key(_) => None,
            Seg::Index(i) => Some(*i),
        }
    }

    /// Returns true if this segment addresses the node at `key`.
    #[inline]
    pub fn matches(&self, key: NodeKey<'_>) -> bool {
        match (self, key) {
            (Seg::Key(k), NodeKey::Key(other)) => k == other,
            (Seg::Index(i), NodeKey::Index(other)) => *i == other,
            _ => false,
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, ".{}", k),
            Seg::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// Borrowed key of a node being visited by the reducer or a matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKey<'a> {
    /// Property of a mapping.
    Key(&'a str),
    /// Position in an array.
    Index(usize),
}

impl<'a> NodeKey<'a> {
    /// The property name, if the node lives in a mapping.
    #[inline]
    pub fn as_key(&self) -> Option<&'a str> {
        match self {
            NodeKey::Key(k) => Some(k),
            NodeKey::Index(_) => None,
        }
    }

    /// The position, if the node lives in an array.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            NodeKey::Key(_) => None,
            NodeKey::Index(i) => Some(*i),
        }
    }

    /// Owned segment for this key.
    #[inline]
    pub fn to_seg(&self) -> Seg {
        match self {
            NodeKey::Key(k) => Seg::Key((*k).to_owned()),
            NodeKey::Index(i) => Seg::Index(*i),
        }
    }
}

impl fmt::Display for NodeKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Key(k) => f.write_str(k),
            NodeKey::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A complete path into a state tree.
///
/// # Examples
///
/// ```
/// use reaction_state::path;
///
/// let p = path!("domain", "todoList", 0, "completed");
/// assert_eq!(p.len(), 4);
/// assert_eq!(p.to_string(), "$.domain.todoList[0].completed");
/// assert_eq!(p.dotted(), "domain.todoList.0.completed");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Push a segment onto the path.
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Push a key segment onto the path.
    #[inline]
    pub fn push_key(&mut self, k: impl Into<String>) {
        self.0.push(Seg::Key(k.into()));
    }

    /// Push an index segment onto the path.
    #[inline]
    pub fn push_index(&mut self, i: usize) {
        self.0.push(Seg::Index(i));
    }

    /// Pop the last segment from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<Seg> {
        self.0.pop()
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this path is a prefix of another path (or equal to it).
    #[inline]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }

    /// Dotted form used in change reports: `domain.todoList.0`.
    pub fn dotted(&self) -> String {
        let mut out = String::new();
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match seg {
                Seg::Key(k) => out.push_str(k),
                Seg::Index(idx) => out.push_str(&idx.to_string()),
            }
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a [`Path`] from keys and indices.
///
/// ```
/// use reaction_state::path;
///
/// let p = path!("domain", "lists", 0, "nextId");
/// assert_eq!(p.dotted(), "domain.lists.0.nextId");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display_and_dotted() {
        let p = path!("domain", "todoList", 1, "text");
        assert_eq!(format!("{}", p), "$.domain.todoList[1].text");
        assert_eq!(p.dotted(), "domain.todoList.1.text");
        assert_eq!(Path::root().dotted(), "");
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn test_seg_matches_node_key() {
        assert!(Seg::from("todoList").matches(NodeKey::Key("todoList")));
        assert!(!Seg::from("todoList").matches(NodeKey::Key("nextId")));
        assert!(Seg::from(2usize).matches(NodeKey::Index(2)));
        // A numeric-looking key never addresses an array position.
        assert!(!Seg::from("2").matches(NodeKey::Index(2)));
    }

    #[test]
    fn test_prefix() {
        let parent = path!("domain");
        let child = path!("domain", "nextId");
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
        assert!(parent.is_prefix_of(&parent));
    }

    #[test]
    fn test_path_serde() {
        let p = path!("lists", 0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"["lists",0]"#);
        let parsed: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }
}
