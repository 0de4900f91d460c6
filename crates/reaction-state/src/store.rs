//! A minimal single-reducer store with action history.
//!
//! All state changes go through [`Reactions::reduce`], enabling:
//! - Change reporting per dispatch
//! - State replay to any point in history
//! - Batch dispatch

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::bind::Dispatch;
use crate::value::Object;
use crate::{diff, Action, Path, ReactionError, ReactionResult, Reactions, StateValue};

/// Result of applying actions.
#[derive(Debug, Clone)]
pub struct ApplyResult {
    /// Number of actions applied.
    pub actions_applied: usize,
    /// Paths whose identity changed, in dispatch order.
    pub changes: Vec<Path>,
}

/// Owns the current state and reduces actions into it.
///
/// ```
/// use reaction_state::{slice, Reaction, ReactionMap, Reactions, SliceEffect, StateValue, Store};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut reactions = Reactions::new();
/// let map = ReactionMap::new().with_reaction(
///     "Rename",
///     Reaction::new(|args| json!({"name": args[0]}))
///         .with_effect(SliceEffect::set(slice!["name"], |action, _, _| {
///             StateValue::from(&action["name"])
///         })),
/// );
/// reactions.add_reactions(&map, None, None).unwrap();
///
/// let mut store = Store::new(Arc::new(reactions), json!({"name": "a"}));
/// let result = store.dispatch_named("Rename", &[json!("b")]).unwrap();
/// assert_eq!(store.state()["name"], "b");
/// assert_eq!(result.changes.len(), 1);
/// ```
#[derive(Debug)]
pub struct Store {
    reactions: Arc<Reactions>,
    initial: StateValue,
    state: StateValue,
    history: Vec<Action>,
}

impl Store {
    /// Create a store over a populated registry.
    pub fn new(reactions: Arc<Reactions>, initial: impl Into<StateValue>) -> Self {
        let initial = initial.into();
        Self {
            reactions,
            state: initial.clone(),
            initial,
            history: Vec::new(),
        }
    }

    /// The current state. Cheap: containers are shared.
    #[inline]
    pub fn state(&self) -> &StateValue {
        &self.state
    }

    /// The registry this store reduces with.
    #[inline]
    pub fn reactions(&self) -> &Arc<Reactions> {
        &self.reactions
    }

    /// Reduce one action into the state.
    ///
    /// On error the state and history are unchanged.
    pub fn apply(&mut self, action: Action) -> ReactionResult<ApplyResult> {
        let next = self.reactions.reduce(&self.state, &action)?;
        let changes = diff(&self.state, &next);
        debug!(
            action = action.action_type(),
            changes = changes.len(),
            "applied action"
        );
        self.state = next;
        self.history.push(action);
        Ok(ApplyResult {
            actions_applied: 1,
            changes,
        })
    }

    /// Build an action by qualified name and apply it.
    pub fn dispatch_named(&mut self, name: &str, args: &[Value]) -> ReactionResult<ApplyResult> {
        let action = self.reactions.create(name, args)?;
        self.apply(action)
    }

    /// Apply several actions in order.
    ///
    /// Either all actions are applied or none: a failing action leaves the
    /// state and history as they were before the batch.
    pub fn apply_batch(&mut self, actions: Vec<Action>) -> ReactionResult<ApplyResult> {
        if actions.is_empty() {
            return Ok(ApplyResult {
                actions_applied: 0,
                changes: Vec::new(),
            });
        }

        let mut state = self.state.clone();
        for action in &actions {
            state = self.reactions.reduce(&state, action)?;
        }

        let changes = diff(&self.state, &state);
        let count = actions.len();
        self.state = state;
        self.history.extend(actions);

        Ok(ApplyResult {
            actions_applied: count,
            changes,
        })
    }

    /// Replay from the initial state up to (and including) `index`.
    pub fn replay_to(&self, index: usize) -> ReactionResult<StateValue> {
        if index >= self.history.len() {
            return Err(ReactionError::InvalidReplayIndex {
                index,
                len: self.history.len(),
            });
        }

        let mut state = self.initial.clone();
        for action in self.history.iter().take(index + 1) {
            state = self.reactions.reduce(&state, action)?;
        }
        Ok(state)
    }

    /// Every applied action, oldest first.
    #[inline]
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Number of applied actions.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Clear history and make the current state the replay base.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.initial = self.state.clone();
    }

    /// Drop all but the last `keep_last` actions, folding the dropped ones
    /// into the replay base. Returns how many were dropped.
    pub fn prune_history(&mut self, keep_last: usize) -> ReactionResult<usize> {
        let len = self.history.len();
        if len <= keep_last {
            return Ok(0);
        }

        let to_remove = len - keep_last;
        let mut base = self.initial.clone();
        for action in self.history.iter().take(to_remove) {
            base = self.reactions.reduce(&base, action)?;
        }
        self.initial = base;
        self.history.drain(..to_remove);
        Ok(to_remove)
    }

    /// The current state as a group sees it.
    pub fn group_state(&self, group: Option<&str>) -> ReactionResult<StateValue> {
        self.reactions.group_state(&self.state, group)
    }

    /// A group's selector outputs over the current state.
    pub fn select(&self, group: Option<&str>) -> ReactionResult<Object> {
        self.reactions.select(&self.state, group)
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, action: Action) -> ReactionResult<()> {
        self.apply(action).map(|_| ())
    }

    fn state(&self) -> StateValue {
        self.state.clone()
    }
}
