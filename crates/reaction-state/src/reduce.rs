//! Tree-walking reducer.
//!
//! The state tree and the reaction trie are walked in lock-step. At every
//! container the candidate trie children are tested against each property
//! or index; a match runs its effects and contributes its own children as
//! candidates one level down. Only containers reached by at least one match
//! are rebuilt; every other branch is carried into the new tree by
//! reference.

use std::sync::Arc;

use crate::trie::TrieNode;
use crate::value::{Object, NULL};
use crate::{Action, NodeKey, Path, ReactionResult, StateValue};

/// What callbacks can see during one reduction.
pub(crate) struct Scope<'a> {
    pub(crate) action: &'a Action,
    /// The state as dispatched.
    pub(crate) root: &'a StateValue,
    /// The remapped view of `root`.
    pub(crate) view: &'a StateValue,
}

/// Rebuild `scope.root` against the trie of the dispatched action.
pub(crate) fn reduce_tree(trie: &TrieNode, scope: &Scope<'_>) -> ReactionResult<StateValue> {
    let candidates: Vec<&TrieNode> = trie.children().iter().collect();
    let mut path = Path::root();
    rebuild(scope.root, &candidates, scope, &mut path)
}

/// Rebuild one container against a set of candidate trie nodes.
fn rebuild(
    node: &StateValue,
    candidates: &[&TrieNode],
    scope: &Scope<'_>,
    path: &mut Path,
) -> ReactionResult<StateValue> {
    match node {
        StateValue::Object(props) => {
            let mut out = Object::with_capacity(props.len());
            for (key, child) in props.iter() {
                path.push_key(key.as_str());
                let next = reduce_slot(child, NodeKey::Key(key), candidates, scope, path)?;
                path.pop();
                if let Some(value) = next {
                    out.insert(key.clone(), value);
                }
            }
            Ok(StateValue::Object(Arc::new(out)))
        }
        StateValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            let mut holes = false;
            for (index, child) in items.iter().enumerate() {
                path.push_index(index);
                let next = reduce_slot(child, NodeKey::Index(index), candidates, scope, path)?;
                path.pop();
                match next {
                    Some(value) => {
                        holes |= value.is_null();
                        out.push(value);
                    }
                    None => holes = true,
                }
            }
            if holes {
                out.retain(|value| !value.is_null());
            }
            Ok(StateValue::Array(Arc::new(out)))
        }
        scalar => Ok(scalar.clone()),
    }
}

/// Process one property or index. `None` means the slot was deleted.
fn reduce_slot(
    old: &StateValue,
    key: NodeKey<'_>,
    candidates: &[&TrieNode],
    scope: &Scope<'_>,
    path: &mut Path,
) -> ReactionResult<Option<StateValue>> {
    let mut current = Some(old.clone());
    let mut next: Vec<&TrieNode> = Vec::new();

    for candidate in candidates {
        let Some(step) = candidate.step() else {
            continue;
        };
        if !step.matches(scope, current.as_ref().unwrap_or(&NULL), key) {
            continue;
        }
        for effect in candidate.effects() {
            current = effect.apply(scope.action, scope.view, current, path)?;
        }
        next.extend(candidate.children());
    }

    match current {
        Some(value) if !next.is_empty() => rebuild(&value, &next, scope, path).map(Some),
        other => Ok(other),
    }
}
