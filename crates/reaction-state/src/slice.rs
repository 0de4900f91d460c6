//! Declaration paths with dynamic segments.
//!
//! A [`SlicePath`] is what a reaction declares: a sequence of literal keys,
//! literal indices and [`Matcher`] predicates. Literal segments address one
//! child; a matcher selects every child for which it returns true, decided
//! against the state at dispatch time.

use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::{Action, NodeKey, Seg, StateValue};

/// Predicate signature: `(action, state, candidate, key)`.
pub type MatchFn = dyn Fn(&Action, &StateValue, &StateValue, NodeKey<'_>) -> bool + Send + Sync;

static NEXT_MATCHER_ID: AtomicU64 = AtomicU64::new(1);

/// A predicate path segment.
///
/// Every `Matcher::new` call mints a fresh identity; clones share it. Two
/// matchers compare equal only when they are clones of the same declaration,
/// which is what keeps unrelated predicates apart in the reaction trie.
#[derive(Clone)]
pub struct Matcher {
    id: u64,
    site: &'static Location<'static>,
    f: Arc<MatchFn>,
}

impl Matcher {
    /// Declare a predicate segment.
    #[track_caller]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Action, &StateValue, &StateValue, NodeKey<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            id: NEXT_MATCHER_ID.fetch_add(1, Ordering::Relaxed),
            site: Location::caller(),
            f: Arc::new(f),
        }
    }

    /// Stable identity of this declaration.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Source location of the declaration.
    #[inline]
    pub fn site(&self) -> &'static Location<'static> {
        self.site
    }

    /// Evaluate the predicate.
    #[inline]
    pub fn matches(
        &self,
        action: &Action,
        state: &StateValue,
        candidate: &StateValue,
        key: NodeKey<'_>,
    ) -> bool {
        (self.f)(action, state, candidate, key)
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Matcher {}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher#{}({})", self.id, self.site)
    }
}

/// One segment of a declaration path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SliceSeg {
    /// Literal mapping property.
    Key(String),
    /// Literal array position.
    Index(usize),
    /// Predicate over the children of the current node.
    Match(Matcher),
}

impl SliceSeg {
    /// The literal form of this segment, if it has one.
    pub fn literal(&self) -> Option<Seg> {
        match self {
            SliceSeg::Key(k) => Some(Seg::Key(k.clone())),
            SliceSeg::Index(i) => Some(Seg::Index(*i)),
            SliceSeg::Match(_) => None,
        }
    }

    /// Step from `node` to the child this segment designates.
    ///
    /// Predicates pick the first matching child: arrays by index, mappings
    /// by property. `root` is the state handed to the predicate.
    pub fn resolve<'a>(
        &self,
        node: &'a StateValue,
        action: &Action,
        root: &StateValue,
    ) -> Option<&'a StateValue> {
        match self {
            SliceSeg::Key(k) => node.get(k),
            SliceSeg::Index(i) => node.get_index(*i),
            SliceSeg::Match(matcher) => match node {
                StateValue::Array(items) => items
                    .iter()
                    .enumerate()
                    .find(|(i, item)| matcher.matches(action, root, item, NodeKey::Index(*i)))
                    .map(|(_, item)| item),
                StateValue::Object(map) => map
                    .iter()
                    .find(|(k, v)| matcher.matches(action, root, v, NodeKey::Key(k)))
                    .map(|(_, v)| v),
                _ => None,
            },
        }
    }
}

impl fmt::Display for SliceSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceSeg::Key(k) => f.write_str(k),
            SliceSeg::Index(i) => write!(f, "{}", i),
            SliceSeg::Match(m) => write!(f, "<match@{}:{}>", m.site.file(), m.site.line()),
        }
    }
}

impl From<&str> for SliceSeg {
    fn from(s: &str) -> Self {
        SliceSeg::Key(s.to_owned())
    }
}

impl From<String> for SliceSeg {
    fn from(s: String) -> Self {
        SliceSeg::Key(s)
    }
}

impl From<usize> for SliceSeg {
    fn from(i: usize) -> Self {
        SliceSeg::Index(i)
    }
}

impl From<Matcher> for SliceSeg {
    fn from(m: Matcher) -> Self {
        SliceSeg::Match(m)
    }
}

impl From<&Matcher> for SliceSeg {
    fn from(m: &Matcher) -> Self {
        SliceSeg::Match(m.clone())
    }
}

/// A declaration path: where in the state tree an effect applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlicePath(Vec<SliceSeg>);

impl SlicePath {
    /// An empty slice.
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from segments.
    #[inline]
    pub fn from_segments(segments: Vec<SliceSeg>) -> Self {
        Self(segments)
    }

    /// Push a segment.
    #[inline]
    pub fn push(&mut self, seg: impl Into<SliceSeg>) {
        self.0.push(seg.into());
    }

    /// The segments in order.
    #[inline]
    pub fn segments(&self) -> &[SliceSeg] {
        &self.0
    }

    /// First segment.
    #[inline]
    pub fn first(&self) -> Option<&SliceSeg> {
        self.0.first()
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty slice.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &SliceSeg> {
        self.0.iter()
    }

    /// Resolve the slice from `root`, feeding `root` to every predicate.
    pub fn resolve<'a>(&self, root: &'a StateValue, action: &Action) -> Option<&'a StateValue> {
        self.0
            .iter()
            .try_fold(root, |node, seg| seg.resolve(node, action, root))
    }
}

impl fmt::Display for SlicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromIterator<SliceSeg> for SlicePath {
    fn from_iter<I: IntoIterator<Item = SliceSeg>>(iter: I) -> Self {
        SlicePath(iter.into_iter().collect())
    }
}

/// Construct a [`SlicePath`] from keys, indices and matchers.
///
/// ```
/// use reaction_state::{slice, Matcher};
///
/// let item = Matcher::new(|action, _, item, _| action["id"] == item["id"].to_json());
/// let s = slice!["domain", "todoList", item];
/// assert_eq!(s.len(), 3);
/// ```
#[macro_export]
macro_rules! slice {
    () => {
        $crate::SlicePath::new()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut s = $crate::SlicePath::new();
        $(
            s.push($crate::SliceSeg::from($seg));
        )+
        s
    }};
}
