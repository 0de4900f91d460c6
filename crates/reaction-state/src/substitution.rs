//! Substitution maps and the state remapper.
//!
//! A substitution map redirects a top-level state property to another slice
//! of the tree, e.g. `domain -> domain.list2`. The same reaction declaration
//! can then be registered once per group, each registration touching its own
//! instance of the repeated sub-state.

use indexmap::IndexMap;

use crate::{Action, SlicePath, StateValue};

/// Top-level property -> replacement slice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionMap(IndexMap<String, SlicePath>);

impl SubstitutionMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirect `prop` to `slice` (builder pattern).
    pub fn with(mut self, prop: impl Into<String>, slice: SlicePath) -> Self {
        self.0.insert(prop.into(), slice);
        self
    }

    /// Redirect `prop` to `slice`.
    pub fn insert(&mut self, prop: impl Into<String>, slice: SlicePath) {
        self.0.insert(prop.into(), slice);
    }

    /// The replacement slice for `prop`.
    pub fn get(&self, prop: &str) -> Option<&SlicePath> {
        self.0.get(prop)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlicePath)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of substituted properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is substituted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the state view an action's callbacks see.
///
/// Without a map (or for a non-mapping root) the root itself is returned, so
/// the view is the same reference as the input. Otherwise each substituted
/// property present at the root is replaced by the value its slice resolves
/// to, with predicates evaluated against the unmapped root. A slice that
/// resolves to nothing leaves `Null` in place of the property.
pub fn remap(
    root: &StateValue,
    substitutions: Option<&SubstitutionMap>,
    action: &Action,
) -> StateValue {
    let (Some(map), StateValue::Object(props)) = (substitutions, root) else {
        return root.clone();
    };

    let mut view = props.as_ref().clone();
    for (prop, slice) in map.iter() {
        if let Some(slot) = view.get_mut(prop) {
            *slot = slice.resolve(root, action).cloned().unwrap_or_default();
        }
    }
    StateValue::object(view)
}
