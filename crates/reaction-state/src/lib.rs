//! Declarative reactions over immutable state trees.
//!
//! `reaction-state` compiles named reactions (an action constructor plus the
//! slices of state it changes) into one trie per action type, and reduces
//! actions by walking the state tree and the trie together. Only the
//! branches a reaction reaches are rebuilt; everything else is shared with
//! the previous state, so identity comparison is enough to find what changed.
//!
//! # Core Concepts
//!
//! - **StateValue**: Persistent JSON-like tree with reference-counted containers
//! - **SlicePath**: Where an effect applies; literal keys, indices and predicate matchers
//! - **Effect**: Set, append, insert, assign or delete at the end of a slice
//! - **Reactions**: Registry of reactions, groups and substitution maps; the reducer
//! - **SubstitutionMap**: Redirects a top-level property so one declaration serves many groups
//! - **Store**: Minimal store with action history and replay
//!
//! # Deterministic Reduction
//!
//! ```text
//! State' = reduce(State, Action)
//! ```
//!
//! - `reduce` never mutates its input
//! - Unknown action types return the input itself
//! - `state_changes(State, State')` lists exactly the rebuilt nodes
//!
//! # Quick Start
//!
//! ```
//! use reaction_state::{
//!     slice, state_changes, Matcher, Reaction, ReactionMap, Reactions, SliceEffect, StateValue,
//! };
//! use serde_json::json;
//!
//! let item = Matcher::new(|action, _, item, _| item["id"] == action["id"]);
//! let todos = ReactionMap::new().with_reaction(
//!     "ToggleItem",
//!     Reaction::new(|args| json!({"id": args[0]})).with_effect(SliceEffect::assign(
//!         slice!["todoList", item],
//!         |_, _, item| StateValue::from(json!({"completed": item["completed"] != true})),
//!     )),
//! );
//!
//! let mut reactions = Reactions::new();
//! reactions.add_reactions(&todos, None, None).unwrap();
//!
//! let state = StateValue::from(json!({"todoList": [{"id": 0, "completed": false}]}));
//! let action = reactions.create("ToggleItem", &[json!(0)]).unwrap();
//! let next = reactions.reduce(&state, &action).unwrap();
//!
//! assert_eq!(next["todoList"][0]["completed"], true);
//! assert_eq!(state_changes(&state, &next), "todoList;todoList.0;todoList.0.completed;");
//! ```

mod action;
mod bind;
mod diff;
mod effect;
mod error;
mod path;
mod reaction;
mod reduce;
mod registry;
mod slice;
mod store;
mod substitution;
mod trie;
mod value;

// Core types
pub use action::{Action, ActionCreator, ActionTable, PayloadFn};
pub use diff::{diff, state_changes};
pub use effect::{Effect, InsertFn, SliceEffect, ValueFn};
pub use error::{ReactionError, ReactionResult};
pub use path::{NodeKey, Path, Seg};
pub use slice::{MatchFn, Matcher, SlicePath, SliceSeg};
pub use value::{Object, StateValue};

// Registration and reduction
pub use reaction::{Entry, Reaction, ReactionMap, Selector, Thunk, ThunkFn};
pub use registry::{GroupEntry, Reactions};
pub use substitution::{remap, SubstitutionMap};
pub use trie::{Step, TrieNode};

// Binding and the store
pub use bind::{ContextBound, DeferredActions, Dispatch, DispatchBound, ThunkScope};
pub use store::{ApplyResult, Store};
