//! Edge case tests for reaction-state.

use reaction_state::{
    path, slice, state_changes, Effect, Matcher, Reaction, ReactionError, ReactionMap, Reactions,
    SliceEffect, StateValue,
};
use serde_json::{json, Value};

fn single(name: &str, effects: Vec<SliceEffect>) -> Reactions {
    let reaction = Reaction::new(|args| json!({"args": args})).with_effects(effects);
    let map = ReactionMap::new().with_reaction(name, reaction);
    let mut reactions = Reactions::new();
    reactions.add_reactions(&map, None, None).unwrap();
    reactions
}

fn run(reactions: &Reactions, name: &str, state: &StateValue) -> Result<StateValue, ReactionError> {
    let action = reactions.create(name, &[])?;
    reactions.reduce(state, &action)
}

// ============================================================================
// Identity and sharing
// ============================================================================

#[test]
fn test_unregistered_action_returns_same_state() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["x"])]);
    let state = StateValue::from(json!({"x": 1, "y": {"z": [1, 2]}}));
    let other = single("B", vec![SliceEffect::delete(slice!["x"])]).create("B", &[]).unwrap();

    let next = reactions.reduce(&state, &other).unwrap();
    assert!(next.same(&state));
    assert_eq!(state_changes(&state, &next), "");
}

#[test]
fn test_matched_root_is_always_rebuilt() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["missing", "deeper"])]);
    let state = StateValue::from(json!({"x": {"a": 1}}));
    let next = run(&reactions, "A", &state).unwrap();

    assert!(!next.same(&state));
    assert!(next["x"].same(&state["x"]));
    assert_eq!(next, json!({"x": {"a": 1}}));
}

#[test]
fn test_scalar_root_passes_through() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["x"])]);
    let next = run(&reactions, "A", &StateValue::from(7)).unwrap();
    assert_eq!(next, 7);
}

// ============================================================================
// Effects
// ============================================================================

#[test]
fn test_effects_run_in_registration_order() {
    let reactions = single(
        "A",
        vec![
            SliceEffect::set(slice!["n"], |_, _, n| StateValue::from(n.as_i64().unwrap_or(0) * 10)),
            SliceEffect::set(slice!["n"], |_, _, n| StateValue::from(n.as_i64().unwrap_or(0) + 1)),
        ],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"n": 2}))).unwrap();
    assert_eq!(next["n"], 21);
}

#[test]
fn test_callbacks_see_input_state_not_intermediate() {
    let reactions = single(
        "A",
        vec![
            SliceEffect::set(slice!["a"], |_, _, _| StateValue::from(100)),
            SliceEffect::set(slice!["b"], |_, state, _| state["a"].clone()),
        ],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"a": 1, "b": 0}))).unwrap();
    assert_eq!(next["a"], 100);
    assert_eq!(next["b"], 1);
}

#[test]
fn test_insert_effect() {
    let reactions = single(
        "A",
        vec![SliceEffect::insert(slice!["items"], |_, _, items| {
            (items.len() / 2, StateValue::from("mid"))
        })],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"items": [1, 2, 3, 4]}))).unwrap();
    assert_eq!(next["items"], json!([1, 2, "mid", 3, 4]));
}

#[test]
fn test_assign_creates_object_from_null() {
    let reactions = single(
        "A",
        vec![SliceEffect::assign(slice!["meta"], |_, _, _| StateValue::from(json!({"k": 1})))],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"meta": null}))).unwrap();
    assert_eq!(next["meta"], json!({"k": 1}));
}

#[test]
fn test_delete_removes_object_key() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["a", "b"])]);
    let next = run(&reactions, "A", &StateValue::from(json!({"a": {"b": 1, "c": 2}}))).unwrap();
    assert_eq!(next, json!({"a": {"c": 2}}));
}

#[test]
fn test_deleted_key_is_reported() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["a", "x"])]);
    let state = StateValue::from(json!({"a": {"x": {"deep": 1}, "y": 2}, "b": {"z": 3}}));
    let next = run(&reactions, "A", &state).unwrap();

    assert_eq!(next["a"], json!({"y": 2}));
    assert!(next["b"].same(&state["b"]));
    assert_eq!(state_changes(&state, &next), "a;a.x;");
}

#[test]
fn test_set_after_delete_revives_slot() {
    let reactions = single(
        "A",
        vec![
            SliceEffect::delete(slice!["a"]),
            SliceEffect::set(slice!["a"], |_, _, current| {
                StateValue::from(current.is_null())
            }),
        ],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"a": 1}))).unwrap();
    assert_eq!(next["a"], true);
}

// ============================================================================
// Array compaction
// ============================================================================

#[test]
fn test_deleted_slots_are_compacted() {
    let odd = Matcher::new(|_, _, v, _| v.as_i64().map_or(false, |n| n % 2 == 1));
    let reactions = single("A", vec![SliceEffect::delete(slice!["items", odd])]);
    let next = run(&reactions, "A", &StateValue::from(json!({"items": [1, 2, 3, 4, 5]}))).unwrap();
    assert_eq!(next["items"], json!([2, 4]));
}

#[test]
fn test_nulled_slots_are_compacted() {
    let second = Matcher::new(|_, _, _, key| key.as_index() == Some(1));
    let reactions = single(
        "A",
        vec![SliceEffect::set(slice!["items", second], |_, _, _| StateValue::Null)],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"items": ["a", "b", "c"]}))).unwrap();
    assert_eq!(next["items"], json!(["a", "c"]));
}

#[test]
fn test_existing_nulls_are_dropped_on_rebuild() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["items", 0])]);
    let next = run(&reactions, "A", &StateValue::from(json!({"items": [0, null, 2]}))).unwrap();
    assert_eq!(next["items"], json!([2]));
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_predicate_over_object_properties() {
    let flagged = Matcher::new(|_, _, v, _| v["flag"] == true);
    let reactions = single(
        "A",
        vec![SliceEffect::set(slice!["users", flagged, "seen"], |_, _, _| StateValue::from(true))],
    );
    let state = StateValue::from(json!({
        "users": {
            "ann": {"flag": true, "seen": false},
            "bob": {"flag": false, "seen": false},
            "cy": {"flag": true, "seen": false}
        }
    }));
    let next = run(&reactions, "A", &state).unwrap();
    assert_eq!(next["users"]["ann"]["seen"], true);
    assert_eq!(next["users"]["cy"]["seen"], true);
    assert!(next["users"]["bob"].same(&state["users"]["bob"]));
}

#[test]
fn test_slices_do_not_create_missing_nodes() {
    let reactions = single(
        "A",
        vec![SliceEffect::set(slice!["a", "new"], |_, _, _| StateValue::from(1))],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"a": {}}))).unwrap();
    assert_eq!(next, json!({"a": {}}));
}

#[test]
fn test_predicate_receives_key() {
    let keyed = Matcher::new(|_, _, _, key| key.as_key().map_or(false, |k| k.starts_with("tmp")));
    let reactions = single("A", vec![SliceEffect::delete(slice![keyed])]);
    let next = run(
        &reactions,
        "A",
        &StateValue::from(json!({"tmp1": 1, "keep": 2, "tmp2": 3})),
    )
    .unwrap();
    assert_eq!(next, json!({"keep": 2}));
}

#[test]
fn test_literal_key_does_not_match_index() {
    let reactions = single("A", vec![SliceEffect::delete(slice!["items", "0"])]);
    let state = StateValue::from(json!({"items": ["a"]}));
    let next = run(&reactions, "A", &state).unwrap();
    assert_eq!(next["items"], json!(["a"]));
}

#[test]
fn test_children_see_elements_appended_by_parent() {
    let all = Matcher::new(|_, _, _, _| true);
    let reactions = single(
        "A",
        vec![
            SliceEffect::append(slice!["items"], |_, _, _| StateValue::from(json!({"v": 1}))),
            SliceEffect::assign(slice!["items", all], |_, _, _| {
                StateValue::from(json!({"seen": true}))
            }),
        ],
    );
    let next = run(&reactions, "A", &StateValue::from(json!({"items": [{"v": 0}]}))).unwrap();
    assert_eq!(
        next["items"],
        json!([{"v": 0, "seen": true}, {"v": 1, "seen": true}])
    );
}

#[test]
fn test_overlapping_slices_union_children() {
    let first = Matcher::new(|_, _, _, key| key.as_index() == Some(0));
    let any = Matcher::new(|_, _, _, _| true);
    let reactions = single(
        "A",
        vec![
            SliceEffect::set(slice!["items", first, "a"], |_, _, _| StateValue::from("first")),
            SliceEffect::set(slice!["items", any, "b"], |_, _, _| StateValue::from("any")),
        ],
    );
    let next = run(
        &reactions,
        "A",
        &StateValue::from(json!({"items": [{"a": 0, "b": 0}, {"a": 0, "b": 0}]})),
    )
    .unwrap();
    assert_eq!(next["items"], json!([{"a": "first", "b": "any"}, {"a": 0, "b": "any"}]));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_append_to_object_reports_path() {
    let reactions = single(
        "A",
        vec![SliceEffect::append(slice!["a", "b"], |_, _, _| StateValue::Null)],
    );
    let err = run(&reactions, "A", &StateValue::from(json!({"a": {"b": {}}}))).unwrap_err();
    match err {
        ReactionError::AppendRequiresArray { path } => assert_eq!(path, path!("a", "b")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_insert_out_of_bounds() {
    let reactions = single(
        "A",
        vec![SliceEffect::insert(slice!["items"], |_, _, _| (5, StateValue::Null))],
    );
    let err = run(&reactions, "A", &StateValue::from(json!({"items": [1]}))).unwrap_err();
    assert!(matches!(err, ReactionError::IndexOutOfBounds { index: 5, len: 1, .. }));
    assert!(!err.is_configuration());
}

#[test]
fn test_insert_into_scalar() {
    let reactions = single(
        "A",
        vec![SliceEffect::insert(slice!["items"], |_, _, _| (0, StateValue::Null))],
    );
    let err = run(&reactions, "A", &StateValue::from(json!({"items": "nope"}))).unwrap_err();
    assert!(matches!(
        err,
        ReactionError::TypeMismatch { expected: "array", found: "string", .. }
    ));
}

#[test]
fn test_error_path_inside_array() {
    let all = Matcher::new(|_, _, _, _| true);
    let reactions = single(
        "A",
        vec![SliceEffect::assign(slice!["items", all], |_, _, _| {
            StateValue::from(json!({"x": 1}))
        })],
    );
    let err = run(&reactions, "A", &StateValue::from(json!({"items": [{}, 3]}))).unwrap_err();
    assert_eq!(err.to_string(), "assign requires object value at $.items[1]");
}

#[test]
fn test_registration_errors_leave_registry_unchanged() {
    let mut reactions = single("Keep", vec![SliceEffect::delete(slice!["x"])]);

    let map = ReactionMap::new()
        .with_reaction(
            "Fine",
            Reaction::new(|_| Value::Null).with_effect(SliceEffect::delete(slice!["y"])),
        )
        .with_reaction(
            "Empty",
            Reaction::new(|_| Value::Null).with_effect(SliceEffect::delete(slice![])),
        );
    let err = reactions.add_reactions(&map, None, None).unwrap_err();
    assert!(matches!(err, ReactionError::EmptySlice { ref reaction } if reaction == "Empty"));
    assert!(reactions.action("Fine").is_none());
    assert!(reactions.trie("Fine").is_none());
    assert!(reactions.action("Keep").is_some());

    let map = ReactionMap::new().with_reaction(
        "Bare",
        Reaction::new(|_| Value::Null).with_effect(SliceEffect::new(slice!["y"])),
    );
    assert!(matches!(
        reactions.add_reactions(&map, None, None),
        Err(ReactionError::MissingEffect { .. })
    ));
}

#[test]
fn test_reaction_without_effects_still_creates_actions() {
    let map = ReactionMap::new().with_reaction("Ping", Reaction::new(|_| json!({"ping": true})));
    let mut reactions = Reactions::new();
    reactions.add_reactions(&map, None, None).unwrap();

    let action = reactions.create("Ping", &[]).unwrap();
    assert_eq!(action["ping"], true);
    let state = StateValue::from(json!({"a": 1}));
    assert!(reactions.reduce(&state, &action).unwrap().same(&state));
}

#[test]
fn test_explicit_effect_enum() {
    let effect = SliceEffect::new(slice!["a"]).with_effect(Effect::Delete);
    let reactions = single("A", vec![effect]);
    let next = run(&reactions, "A", &StateValue::from(json!({"a": 1, "b": 2}))).unwrap();
    assert_eq!(next, json!({"b": 2}));
}
