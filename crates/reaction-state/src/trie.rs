//! The reaction trie.
//!
//! All slice effects registered for one action type are merged into a single
//! trie. Each node is one step of a slice: a literal key/index, or a matcher.
//! Effects sit on the node their slice ends at, in registration order.
//!
//! ```text
//! AddItem
//! ├── domain
//! │   ├── nextId      [set]
//! │   └── todoList    [append]
//! └── app
//!     └── filter      [set]
//! ```

use crate::reduce::Scope;
use crate::{Effect, Matcher, NodeKey, Seg, SliceSeg, SlicePath, StateValue, SubstitutionMap};

/// One compiled slice step.
#[derive(Clone, Debug)]
pub enum Step {
    /// Matches the child with this key or index.
    Literal(Seg),
    /// Matches every child the predicate accepts.
    Match {
        /// The predicate.
        matcher: Matcher,
        /// Evaluate against the unmapped root rather than the view. Set on
        /// predicates that came from a substitution map.
        unmapped: bool,
    },
}

impl Step {
    fn same_step(&self, other: &Step) -> bool {
        match (self, other) {
            (Step::Literal(a), Step::Literal(b)) => a == b,
            (
                Step::Match {
                    matcher: a,
                    unmapped: ua,
                },
                Step::Match {
                    matcher: b,
                    unmapped: ub,
                },
            ) => a == b && ua == ub,
            _ => false,
        }
    }

    pub(crate) fn matches(&self, scope: &Scope<'_>, value: &StateValue, key: NodeKey<'_>) -> bool {
        match self {
            Step::Literal(seg) => seg.matches(key),
            Step::Match { matcher, unmapped } => {
                let state = if *unmapped { scope.root } else { scope.view };
                matcher.matches(scope.action, state, value, key)
            }
        }
    }

    fn from_seg(seg: &SliceSeg, unmapped: bool) -> Step {
        match seg {
            SliceSeg::Key(k) => Step::Literal(Seg::Key(k.clone())),
            SliceSeg::Index(i) => Step::Literal(Seg::Index(*i)),
            SliceSeg::Match(matcher) => Step::Match {
                matcher: matcher.clone(),
                unmapped,
            },
        }
    }
}

/// Turn a declared slice into trie steps, applying the substitution map to
/// its first segment.
pub(crate) fn compile(slice: &SlicePath, substitutions: Option<&SubstitutionMap>) -> Vec<Step> {
    let replacement = match (slice.first(), substitutions) {
        (Some(SliceSeg::Key(prop)), Some(map)) => map.get(prop),
        _ => None,
    };

    match replacement {
        Some(prefix) => prefix
            .iter()
            .map(|seg| Step::from_seg(seg, true))
            .chain(slice.iter().skip(1).map(|seg| Step::from_seg(seg, false)))
            .collect(),
        None => slice.iter().map(|seg| Step::from_seg(seg, false)).collect(),
    }
}

/// A node of the reaction trie.
#[derive(Clone, Debug, Default)]
pub struct TrieNode {
    step: Option<Step>,
    effects: Vec<Effect>,
    children: Vec<TrieNode>,
}

impl TrieNode {
    /// An empty root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// The step this node matches; `None` for the root.
    #[inline]
    pub fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    /// Effects to run when this node matches, in order.
    #[inline]
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Child nodes in insertion order.
    #[inline]
    pub fn children(&self) -> &[TrieNode] {
        &self.children
    }

    /// The literal child for `seg`, if any.
    pub fn child(&self, seg: impl Into<Seg>) -> Option<&TrieNode> {
        let seg = seg.into();
        self.children
            .iter()
            .find(|c| matches!(&c.step, Some(Step::Literal(s)) if *s == seg))
    }

    /// Children keyed by a matcher.
    pub fn matcher_children(&self) -> impl Iterator<Item = &TrieNode> {
        self.children
            .iter()
            .filter(|c| matches!(c.step, Some(Step::Match { .. })))
    }

    /// Total number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Walk `steps` from this node, creating nodes as needed, and append
    /// `effect` to the terminal node.
    pub(crate) fn insert(&mut self, steps: Vec<Step>, effect: Effect) {
        let mut node = self;
        for step in steps {
            let pos = match node
                .children
                .iter()
                .position(|c| c.step.as_ref().map_or(false, |s| s.same_step(&step)))
            {
                Some(pos) => pos,
                None => {
                    node.children.push(TrieNode {
                        step: Some(step),
                        ..TrieNode::default()
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[pos];
        }
        node.effects.push(effect);
    }
}
