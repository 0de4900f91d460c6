//! Reaction declarations.
//!
//! A [`ReactionMap`] is the unit of registration: an ordered set of named
//! entries, each either a [`Reaction`] (action constructor plus slice
//! effects), a [`Selector`] or a [`Thunk`].

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::action::PayloadFn;
use crate::bind::{Dispatch, ThunkScope};
use crate::{ReactionResult, SliceEffect, StateValue};

/// An action constructor together with the state it affects.
#[derive(Clone, Default)]
pub struct Reaction {
    action: Option<Arc<PayloadFn>>,
    effects: Vec<SliceEffect>,
}

impl Reaction {
    /// A reaction with the given action constructor and no effects.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            action: Some(Arc::new(action)),
            effects: Vec::new(),
        }
    }

    /// A reaction without an action constructor; rejected at registration.
    pub fn without_action() -> Self {
        Self::default()
    }

    /// Add a slice effect (builder pattern).
    pub fn with_effect(mut self, effect: SliceEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add several slice effects (builder pattern).
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = SliceEffect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub(crate) fn action(&self) -> Option<&Arc<PayloadFn>> {
        self.action.as_ref()
    }

    /// The declared slice effects in order.
    #[inline]
    pub fn effects(&self) -> &[SliceEffect] {
        &self.effects
    }
}

impl fmt::Debug for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("has_action", &self.action.is_some())
            .field("effects", &self.effects)
            .finish()
    }
}

/// Derives a value from a group's state view.
#[derive(Clone)]
pub struct Selector(Arc<dyn Fn(&StateValue) -> StateValue + Send + Sync>);

impl Selector {
    /// Wrap a selector function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&StateValue) -> StateValue + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluate against a state view.
    #[inline]
    pub fn select(&self, state: &StateValue) -> StateValue {
        (self.0)(state)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector")
    }
}

/// Thunk signature: bound scope plus the dispatcher.
pub type ThunkFn = dyn Fn(&ThunkScope<'_>, &mut dyn Dispatch) -> ReactionResult<()> + Send + Sync;

/// A deferred action: runs with the caller's props and may dispatch any
/// number of actions.
#[derive(Clone)]
pub struct Thunk(Arc<ThunkFn>);

impl Thunk {
    /// Wrap a thunk function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ThunkScope<'_>, &mut dyn Dispatch) -> ReactionResult<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the thunk.
    #[inline]
    pub fn run(&self, scope: &ThunkScope<'_>, dispatch: &mut dyn Dispatch) -> ReactionResult<()> {
        (self.0)(scope, dispatch)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk")
    }
}

/// One named entry of a reaction map.
#[derive(Clone, Debug)]
pub enum Entry {
    /// Action constructor plus effects.
    Reaction(Reaction),
    /// State selector; contributes no trie nodes.
    Selector(Selector),
    /// Deferred action; contributes no trie nodes.
    Thunk(Thunk),
}

/// Ordered set of named entries registered together.
///
/// ```
/// use reaction_state::{slice, Reaction, ReactionMap, SliceEffect, StateValue};
///
/// let filters = ReactionMap::new().with_reaction(
///     "FilterList",
///     Reaction::new(|args| serde_json::json!({"filter": args[0]})).with_effect(
///         SliceEffect::set(slice!["app", "filter"], |action, _, _| {
///             StateValue::from(&action["filter"])
///         }),
///     ),
/// );
/// assert_eq!(filters.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReactionMap {
    entries: IndexMap<String, Entry>,
}

impl ReactionMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reaction (builder pattern).
    pub fn with_reaction(mut self, name: impl Into<String>, reaction: Reaction) -> Self {
        self.entries.insert(name.into(), Entry::Reaction(reaction));
        self
    }

    /// Add a selector (builder pattern).
    pub fn with_selector<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&StateValue) -> StateValue + Send + Sync + 'static,
    {
        self.entries
            .insert(name.into(), Entry::Selector(Selector::new(f)));
        self
    }

    /// Add a thunk (builder pattern).
    pub fn with_thunk<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ThunkScope<'_>, &mut dyn Dispatch) -> ReactionResult<()> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Entry::Thunk(Thunk::new(f)));
        self
    }

    /// Insert an entry, replacing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, entry: Entry) {
        self.entries.insert(name.into(), entry);
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Iterate over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
