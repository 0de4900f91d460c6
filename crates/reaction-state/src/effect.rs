//! Slice effects: what a reaction does to the node its slice reaches.

use std::fmt;
use std::sync::Arc;

use crate::value::NULL;
use crate::{Action, Path, ReactionError, ReactionResult, SlicePath, StateValue};

/// `(action, state, current) -> value` callback of Set, Append and Assign.
pub type ValueFn = dyn Fn(&Action, &StateValue, &StateValue) -> StateValue + Send + Sync;

/// `(action, state, current) -> (index, element)` callback of Insert.
pub type InsertFn = dyn Fn(&Action, &StateValue, &StateValue) -> (usize, StateValue) + Send + Sync;

/// A single state transformation.
#[derive(Clone)]
pub enum Effect {
    /// Replace the node with the returned value.
    Set(Arc<ValueFn>),
    /// Push the returned element onto the array node.
    Append(Arc<ValueFn>),
    /// Insert the returned element at the returned position.
    Insert(Arc<InsertFn>),
    /// Shallow-merge the returned object into the object node.
    Assign(Arc<ValueFn>),
    /// Remove the node. Array slots are compacted.
    Delete,
}

impl Effect {
    /// Get the effect name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Set(_) => "set",
            Effect::Append(_) => "append",
            Effect::Insert(_) => "insert",
            Effect::Assign(_) => "assign",
            Effect::Delete => "delete",
        }
    }

    /// Run the effect against the current value of a slot.
    ///
    /// `None` is a deleted slot. `state` is the view handed to callbacks and
    /// `path` is only used for error reporting.
    pub(crate) fn apply(
        &self,
        action: &Action,
        state: &StateValue,
        current: Option<StateValue>,
        path: &Path,
    ) -> ReactionResult<Option<StateValue>> {
        let value = current.as_ref().unwrap_or(&NULL);
        let next = match self {
            Effect::Set(f) => f(action, state, value),
            Effect::Append(f) => {
                let element = f(action, state, value);
                let mut items = match value {
                    StateValue::Array(items) => items.as_ref().clone(),
                    StateValue::Null => Vec::with_capacity(1),
                    _ => return Err(ReactionError::append_requires_array(path.clone())),
                };
                items.push(element);
                StateValue::array(items)
            }
            Effect::Insert(f) => {
                let (index, element) = f(action, state, value);
                let mut items = match value {
                    StateValue::Array(items) => items.as_ref().clone(),
                    other => {
                        return Err(ReactionError::type_mismatch(
                            path.clone(),
                            "array",
                            other.type_name(),
                        ))
                    }
                };
                if index > items.len() {
                    return Err(ReactionError::index_out_of_bounds(
                        path.clone(),
                        index,
                        items.len(),
                    ));
                }
                items.insert(index, element);
                StateValue::array(items)
            }
            Effect::Assign(f) => {
                let mut merged = match value {
                    StateValue::Object(map) => map.as_ref().clone(),
                    StateValue::Null => Default::default(),
                    _ => return Err(ReactionError::assign_requires_object(path.clone())),
                };
                match f(action, state, value) {
                    StateValue::Object(fields) => {
                        for (k, v) in fields.iter() {
                            merged.insert(k.clone(), v.clone());
                        }
                    }
                    StateValue::Null => {}
                    _ => return Err(ReactionError::assign_requires_object(path.clone())),
                }
                StateValue::object(merged)
            }
            Effect::Delete => return Ok(None),
        };
        Ok(Some(next))
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Effect::{}", self.name())
    }
}

/// An effect declared on a slice.
///
/// Built either in one step (`SliceEffect::set(slice, f)`) or by attaching an
/// effect to `SliceEffect::new(slice)`. A slice effect that never receives an
/// effect is rejected at registration.
#[derive(Clone, Debug)]
pub struct SliceEffect {
    slice: SlicePath,
    effect: Option<Effect>,
}

impl SliceEffect {
    /// A slice with no effect attached yet.
    pub fn new(slice: SlicePath) -> Self {
        Self {
            slice,
            effect: None,
        }
    }

    /// Attach an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Replace the node at `slice`.
    pub fn set<F>(slice: SlicePath, f: F) -> Self
    where
        F: Fn(&Action, &StateValue, &StateValue) -> StateValue + Send + Sync + 'static,
    {
        Self::new(slice).with_effect(Effect::Set(Arc::new(f)))
    }

    /// Append to the array at `slice`.
    pub fn append<F>(slice: SlicePath, f: F) -> Self
    where
        F: Fn(&Action, &StateValue, &StateValue) -> StateValue + Send + Sync + 'static,
    {
        Self::new(slice).with_effect(Effect::Append(Arc::new(f)))
    }

    /// Insert into the array at `slice`.
    pub fn insert<F>(slice: SlicePath, f: F) -> Self
    where
        F: Fn(&Action, &StateValue, &StateValue) -> (usize, StateValue) + Send + Sync + 'static,
    {
        Self::new(slice).with_effect(Effect::Insert(Arc::new(f)))
    }

    /// Shallow-merge into the object at `slice`.
    pub fn assign<F>(slice: SlicePath, f: F) -> Self
    where
        F: Fn(&Action, &StateValue, &StateValue) -> StateValue + Send + Sync + 'static,
    {
        Self::new(slice).with_effect(Effect::Assign(Arc::new(f)))
    }

    /// Remove the node at `slice`.
    pub fn delete(slice: SlicePath) -> Self {
        Self::new(slice).with_effect(Effect::Delete)
    }

    /// The declared slice.
    #[inline]
    pub fn slice(&self) -> &SlicePath {
        &self.slice
    }

    /// The attached effect, if any.
    #[inline]
    pub fn effect(&self) -> Option<&Effect> {
        self.effect.as_ref()
    }
}
