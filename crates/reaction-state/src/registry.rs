//! The reaction registry.
//!
//! [`Reactions`] is the context object everything hangs off: action
//! creators, per-group tables, substitution maps and the compiled tries.
//! Registration needs `&mut Reactions`; reduction only reads it, so a
//! populated registry can be shared behind an `Arc`.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::bind::DeferredActions;
use crate::reaction::{Entry, Selector, Thunk};
use crate::reduce::{reduce_tree, Scope};
use crate::trie::{compile, TrieNode};
use crate::value::Object;
use crate::{
    remap, Action, ActionCreator, ActionTable, ReactionError, ReactionMap, ReactionResult,
    StateValue, SubstitutionMap,
};

/// What one group (or the ungrouped root) has registered.
#[derive(Clone, Debug, Default)]
pub struct GroupEntry {
    actions: ActionTable,
    thunks: IndexMap<String, Thunk>,
    selectors: IndexMap<String, Selector>,
    substitutions: Option<Arc<SubstitutionMap>>,
}

impl GroupEntry {
    /// Action creators by bare name.
    #[inline]
    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// Action creator by bare name.
    pub fn action(&self, name: &str) -> Option<&ActionCreator> {
        self.actions.get(name)
    }

    /// Thunks by name.
    #[inline]
    pub fn thunks(&self) -> &IndexMap<String, Thunk> {
        &self.thunks
    }

    /// Selectors by name.
    #[inline]
    pub fn selectors(&self) -> &IndexMap<String, Selector> {
        &self.selectors
    }

    /// The group's substitution map.
    pub fn substitutions(&self) -> Option<&SubstitutionMap> {
        self.substitutions.as_deref()
    }

    /// True when nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.thunks.is_empty() && self.selectors.is_empty()
    }
}

/// Registry of reactions and the reducer over them.
#[derive(Debug, Default)]
pub struct Reactions {
    actions: ActionTable,
    root: GroupEntry,
    groups: IndexMap<String, GroupEntry>,
    substitutions: HashMap<String, Arc<SubstitutionMap>>,
    tries: HashMap<String, TrieNode>,
}

fn qualify(group: Option<&str>, name: &str) -> String {
    match group {
        Some(group) => format!("{group}.{name}"),
        None => name.to_string(),
    }
}

impl Reactions {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one reaction map.
    ///
    /// Reactions are recorded under `group.name` when a group is given.
    /// Slices starting with a substituted property are compiled against the
    /// substitution map. Nothing is recorded if any entry is invalid.
    pub fn add_reactions(
        &mut self,
        reactions: &ReactionMap,
        substitutions: Option<SubstitutionMap>,
        group: Option<&str>,
    ) -> ReactionResult<()> {
        self.add_reaction_maps([reactions], substitutions, group)
    }

    /// Register several reaction maps in order, sharing one substitution map
    /// and group.
    pub fn add_reaction_maps<'a, I>(
        &mut self,
        maps: I,
        substitutions: Option<SubstitutionMap>,
        group: Option<&str>,
    ) -> ReactionResult<()>
    where
        I: IntoIterator<Item = &'a ReactionMap>,
    {
        let maps: Vec<&ReactionMap> = maps.into_iter().collect();
        self.validate(&maps, substitutions.as_ref(), group)?;

        let substitutions = substitutions.map(Arc::new);
        let entry = match group {
            Some(group) => self.groups.entry(group.to_string()).or_default(),
            None => &mut self.root,
        };
        if substitutions.is_some() {
            if entry.substitutions.is_some() && entry.substitutions != substitutions {
                warn!("replacing substitution map of the ungrouped reactions");
            }
            entry.substitutions = substitutions.clone();
        }

        let mut registered = 0usize;
        for map in &maps {
            for (name, item) in map.iter() {
                match item {
                    Entry::Reaction(reaction) => {
                        let qualified = qualify(group, name);
                        let Some(payload) = reaction.action() else {
                            continue;
                        };
                        let creator = ActionCreator::new(qualified.clone(), payload.clone());
                        entry.actions.insert(name.to_string(), creator.clone());
                        self.actions.insert(qualified.clone(), creator);
                        if let Some(map) = &substitutions {
                            self.substitutions.insert(qualified.clone(), map.clone());
                        }
                        if reaction.effects().is_empty() {
                            continue;
                        }
                        let trie = self.tries.entry(qualified).or_default();
                        for slice_effect in reaction.effects() {
                            if let Some(effect) = slice_effect.effect() {
                                let steps = compile(slice_effect.slice(), substitutions.as_deref());
                                trie.insert(steps, effect.clone());
                            }
                        }
                        registered += 1;
                    }
                    Entry::Selector(selector) => {
                        entry.selectors.insert(name.to_string(), selector.clone());
                    }
                    Entry::Thunk(thunk) => {
                        entry.thunks.insert(name.to_string(), thunk.clone());
                    }
                }
            }
        }

        debug!(
            group = group.unwrap_or(""),
            maps = maps.len(),
            reactions = registered,
            substituted = substitutions.is_some(),
            "registered reactions"
        );
        Ok(())
    }

    fn validate(
        &self,
        maps: &[&ReactionMap],
        substitutions: Option<&SubstitutionMap>,
        group: Option<&str>,
    ) -> ReactionResult<()> {
        if let Some(name) = group {
            if let Some(existing) = self.groups.get(name) {
                if existing.substitutions() != substitutions {
                    return Err(ReactionError::substitution_conflict(name));
                }
            }
        }

        for map in maps {
            for (name, item) in map.iter() {
                let Entry::Reaction(reaction) = item else {
                    continue;
                };
                let qualified = qualify(group, name);
                if reaction.action().is_none() {
                    return Err(ReactionError::missing_action(qualified));
                }
                for slice_effect in reaction.effects() {
                    if slice_effect.slice().is_empty() {
                        return Err(ReactionError::empty_slice(qualified));
                    }
                    if slice_effect.effect().is_none() {
                        return Err(ReactionError::missing_effect(
                            qualified,
                            slice_effect.slice().to_string(),
                        ));
                    }
                }
                if self.actions.contains_key(&qualified)
                    && self.substitutions(&qualified) != substitutions
                {
                    return Err(ReactionError::substitution_conflict(qualified));
                }
            }
        }
        Ok(())
    }

    /// Action creator by qualified name.
    pub fn action(&self, name: &str) -> Option<&ActionCreator> {
        self.actions.get(name)
    }

    /// Action creator by group and bare name.
    pub fn group_action(&self, group: &str, name: &str) -> Option<&ActionCreator> {
        self.groups.get(group)?.action(name)
    }

    /// Build an action by qualified name.
    pub fn create(&self, name: &str, args: &[Value]) -> ReactionResult<Action> {
        self.action(name)
            .map(|creator| creator.create(args))
            .ok_or_else(|| ReactionError::unknown_action(name))
    }

    /// All action creators by qualified name.
    #[inline]
    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    /// A group's registrations; `None` is the ungrouped root.
    pub fn group(&self, group: Option<&str>) -> ReactionResult<&GroupEntry> {
        match group {
            None => Ok(&self.root),
            Some(name) => self
                .groups
                .get(name)
                .ok_or_else(|| ReactionError::unknown_group(name)),
        }
    }

    /// Registered group names in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// The compiled trie of an action type.
    pub fn trie(&self, action_type: &str) -> Option<&TrieNode> {
        self.tries.get(action_type)
    }

    /// The substitution map of an action type.
    pub fn substitutions(&self, action_type: &str) -> Option<&SubstitutionMap> {
        self.substitutions.get(action_type).map(Arc::as_ref)
    }

    /// Produce the next state for `action`.
    ///
    /// Actions without reactions return `state` itself. Otherwise the root
    /// is rebuilt and every branch no reaction reached is shared with
    /// `state`.
    pub fn reduce(&self, state: &StateValue, action: &Action) -> ReactionResult<StateValue> {
        let Some(trie) = self.tries.get(action.action_type()) else {
            trace!(action = action.action_type(), "no reactions for action");
            return Ok(state.clone());
        };

        let view = remap(state, self.substitutions(action.action_type()), action);
        let scope = Scope {
            action,
            root: state,
            view: &view,
        };
        let next = reduce_tree(trie, &scope)?;
        debug!(
            action = action.action_type(),
            nodes = trie.descendant_count(),
            "reduced action"
        );
        Ok(next)
    }

    /// The state as a group's callbacks see it.
    pub fn group_state(
        &self,
        state: &StateValue,
        group: Option<&str>,
    ) -> ReactionResult<StateValue> {
        let entry = self.group(group)?;
        Ok(remap(state, entry.substitutions(), &Action::empty()))
    }

    /// Evaluate every selector of a group over the group's view.
    pub fn select(&self, state: &StateValue, group: Option<&str>) -> ReactionResult<Object> {
        let entry = self.group(group)?;
        let view = remap(state, entry.substitutions(), &Action::empty());
        Ok(entry
            .selectors
            .iter()
            .map(|(name, selector)| (name.clone(), selector.select(&view)))
            .collect())
    }

    /// A group's action creators and thunks, not yet bound to a dispatcher.
    pub fn deferred(&self, group: Option<&str>) -> ReactionResult<DeferredActions> {
        let entry = self.group(group)?;
        Ok(DeferredActions::new(entry.actions.clone(), entry.thunks.clone()))
    }

    /// Forget every registration.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.root.is_empty() && self.groups.is_empty()
    }
}
