//! Todo-list reactions shared by the integration tests.
//!
//! The same declaration is registered standalone, against a list selected
//! by index, and once per named group.

#![allow(dead_code)]

use reaction_state::{
    slice, Matcher, Reaction, ReactionMap, SliceEffect, StateValue, SubstitutionMap,
};
use serde_json::{json, Value};

fn first(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or(Value::Null)
}

/// Matches the todo item whose id the action carries.
pub fn item_by_id() -> Matcher {
    Matcher::new(|action, _, item, _| item["id"] == action["id"])
}

/// Matches the list at `domain.currentListIndex`.
pub fn current_list() -> Matcher {
    Matcher::new(|_, state, _, key| {
        key.as_index().map(|i| i as u64) == state["domain"]["currentListIndex"].as_u64()
    })
}

pub fn todo_list() -> ReactionMap {
    let item = item_by_id();
    ReactionMap::new()
        .with_reaction(
            "AddItem",
            Reaction::new(|args| json!({"text": first(args)}))
                .with_effect(SliceEffect::set(slice!["domain", "nextId"], |_, _, next_id| {
                    StateValue::from(next_id.as_i64().unwrap_or(0) + 1)
                }))
                .with_effect(SliceEffect::append(slice!["domain", "todoList"], |action, state, _| {
                    StateValue::from(json!({
                        "text": action["text"],
                        "id": state["domain"]["nextId"].to_json(),
                        "completed": false,
                    }))
                }))
                .with_effect(SliceEffect::set(slice!["app", "filter"], |_, _, filter| {
                    // The filter is a string, so its `filter` property is always null.
                    if filter["filter"] == "SHOW_ACTIVE" {
                        filter["filter"].clone()
                    } else {
                        StateValue::from("SHOW_ALL")
                    }
                })),
        )
        .with_reaction(
            "DeleteItem",
            Reaction::new(|args| json!({"id": first(args)}))
                .with_effect(SliceEffect::delete(slice!["domain", "todoList", &item])),
        )
        .with_reaction(
            "ToggleItem",
            Reaction::new(|args| json!({"id": first(args)})).with_effect(SliceEffect::assign(
                slice!["domain", "todoList", &item],
                |_, _, item| StateValue::from(json!({"completed": item["completed"] != true})),
            )),
        )
        .with_reaction(
            "FilterList",
            Reaction::new(|args| json!({"filter": first(args)})).with_effect(SliceEffect::set(
                slice!["app", "filter"],
                |action, _, _| StateValue::from(&action["filter"]),
            )),
        )
}

/// Selects the current list.
pub fn lists() -> ReactionMap {
    ReactionMap::new().with_reaction(
        "setCurrentList",
        Reaction::new(|args| json!({"index": first(args)})).with_effect(SliceEffect::set(
            slice!["domain", "currentListIndex"],
            |action, _, _| StateValue::from(&action["index"]),
        )),
    )
}

/// Redirects `domain` and `app` to the current list.
pub fn current_list_substitutions() -> SubstitutionMap {
    let current = current_list();
    SubstitutionMap::new()
        .with("app", slice!["app", "lists", &current])
        .with("domain", slice!["domain", "lists", &current])
}

/// Redirects `domain` and `app` to a named list.
pub fn named_list_substitutions(list: &str) -> SubstitutionMap {
    SubstitutionMap::new()
        .with("app", slice!["app", list])
        .with("domain", slice!["domain", list])
}

/// Exposes the group's todo list.
pub fn domain_selector() -> ReactionMap {
    ReactionMap::new().with_selector("todoList", |state| state["domain"]["todoList"].clone())
}

/// Adds an item through the group's own creator.
pub fn thunks() -> ReactionMap {
    ReactionMap::new().with_thunk("AddItemWithThunk", |scope, dispatch| {
        let action = scope.action("AddItem", scope.args)?;
        dispatch.dispatch(action)
    })
}

pub fn standalone_state() -> StateValue {
    StateValue::from(json!({
        "domain": {"todoList": [], "nextId": 0},
        "app": {"filter": "SHOW_ALL"}
    }))
}

pub fn indexed_lists_state() -> StateValue {
    StateValue::from(json!({
        "domain": {
            "currentListIndex": 0,
            "lists": [{"todoList": [], "nextId": 0}]
        },
        "app": {"lists": [{"filter": "SHOW_ALL"}]}
    }))
}

pub fn named_lists_state(names: &[&str]) -> StateValue {
    let mut domain = serde_json::Map::new();
    let mut app = serde_json::Map::new();
    for name in names {
        domain.insert(name.to_string(), json!({"todoList": [], "nextId": 0}));
        app.insert(name.to_string(), json!({"filter": "SHOW_ALL"}));
    }
    StateValue::from(json!({"domain": domain, "app": app}))
}
