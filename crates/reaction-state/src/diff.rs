//! Reference-identity diff between two state trees.
//!
//! Two values differ when they are not [`StateValue::same`]. Because the
//! reducer shares every untouched branch, this lists exactly the nodes a
//! reduction rebuilt, replaced or removed.

use crate::{Path, StateValue};

/// Paths whose identity changed from `old` to `new`, in the enumeration
/// order of `new`. Properties removed from a mapping follow that mapping's
/// surviving properties, in the order of `old`. The root itself is never
/// listed.
pub fn diff(old: &StateValue, new: &StateValue) -> Vec<Path> {
    let mut changes = Vec::new();
    let mut path = Path::root();
    walk(old, new, &mut path, &mut changes);
    changes
}

/// Changed paths in dotted form, each followed by `;`.
///
/// ```
/// use reaction_state::{state_changes, StateValue};
/// use serde_json::json;
///
/// let old = StateValue::from(json!({"a": 1, "b": 2}));
/// let new = StateValue::from(json!({"a": 1, "b": 3}));
/// assert_eq!(state_changes(&old, &new), "b;");
/// ```
pub fn state_changes(old: &StateValue, new: &StateValue) -> String {
    diff(old, new).iter().fold(String::new(), |mut out, path| {
        out.push_str(&path.dotted());
        out.push(';');
        out
    })
}

fn walk(old: &StateValue, new: &StateValue, path: &mut Path, changes: &mut Vec<Path>) {
    if old.same(new) {
        return;
    }
    match (old, new) {
        (StateValue::Object(before), StateValue::Object(after)) => {
            for (key, value) in after.iter() {
                path.push_key(key.as_str());
                match before.get(key) {
                    Some(prev) => visit(prev, value, path, changes),
                    None => changes.push(path.clone()),
                }
                path.pop();
            }
            for key in before.keys().filter(|key| !after.contains_key(*key)) {
                path.push_key(key.as_str());
                changes.push(path.clone());
                path.pop();
            }
        }
        (StateValue::Array(before), StateValue::Array(after)) if before.len() == after.len() => {
            for (index, (prev, value)) in before.iter().zip(after.iter()).enumerate() {
                path.push_index(index);
                visit(prev, value, path, changes);
                path.pop();
            }
        }
        _ => {}
    }
}

fn visit(old: &StateValue, new: &StateValue, path: &mut Path, changes: &mut Vec<Path>) {
    if old.same(new) {
        return;
    }
    changes.push(path.clone());
    walk(old, new, path, changes);
}
