use proptest::prelude::*;
use serde_json::{Value, json};

use crate::core::progress::{ActivityState, CompletionState, MapProgress, UserState};
use crate::state::Action;

/// Node ids of the `intro` sample map plus one unknown id.
const INTRO_NODES: &[&str] = &["basics", "badge", "loops", "events", "done", "ghost"];

fn arb_node_id() -> impl Strategy<Value = String> {
    prop::sample::select(INTRO_NODES).prop_map(str::to_string)
}

fn arb_map_id() -> impl Strategy<Value = String> {
    prop::sample::select(&["intro", "advanced", "missing"][..]).prop_map(str::to_string)
}

/// Intents that touch learner progress, aimed mostly at the sample maps.
pub fn arb_progress_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => (arb_map_id(), arb_node_id()).prop_map(|(m, a)| Action::open_activity(m, a)),
        3 => any::<bool>().prop_map(|finished| Action::CloseActivity { finished }),
        1 => Just(Action::SaveAndCloseActivity),
        2 => (arb_map_id(), arb_node_id()).prop_map(|(m, a)| Action::restart_activity(m, a)),
        3 => (
            arb_map_id(),
            arb_node_id(),
            prop::option::of("[a-z0-9]{4,8}"),
            prop::option::of(0u32..10),
            prop::option::of(1u32..10),
            any::<bool>(),
        )
            .prop_map(|(m, a, header, step, max, done)| Action::SetHeaderForActivity {
                map_id: m,
                activity_id: a,
                header_id: header,
                current_step: step,
                max_steps: max,
                is_completed: done,
            }),
        1 => arb_map_id().prop_map(|map_id| Action::SetSkillMapCompleted { map_id }),
        1 => Just(Action::UpdateUserCompletedTags),
    ]
}

fn arb_completion_state() -> impl Strategy<Value = CompletionState> {
    prop_oneof![
        Just(CompletionState::Incomplete),
        Just(CompletionState::Transitioning),
        Just(CompletionState::Completed),
    ]
}

fn arb_activity_state(activity_id: String) -> impl Strategy<Value = ActivityState> {
    (
        any::<bool>(),
        prop::option::of("[a-z0-9]{4,8}"),
        prop::option::of(0u32..10),
    )
        .prop_map(move |(is_completed, header_id, current_step)| ActivityState {
            activity_id: activity_id.clone(),
            is_completed,
            header_id,
            current_step,
            max_steps: current_step.map(|s| s + 1),
            completed_time: None,
        })
}

fn arb_map_progress(map_id: &'static str) -> impl Strategy<Value = MapProgress> {
    (
        arb_completion_state(),
        prop::collection::vec(arb_node_id().prop_flat_map(arb_activity_state), 0..4),
    )
        .prop_map(move |(completion_state, activities)| MapProgress {
            map_id: map_id.to_string(),
            completion_state,
            activity_state: activities
                .into_iter()
                .map(|s| (s.activity_id.clone(), s))
                .collect(),
        })
}

/// Current-schema users with progress under one or two sources.
pub fn arb_user_state() -> impl Strategy<Value = UserState> {
    (
        "[a-z0-9]{6}",
        prop::option::of(arb_map_progress("intro")),
        prop::option::of(arb_map_progress("advanced")),
    )
        .prop_map(|(id, default_intro, other_advanced)| {
            let mut user = UserState::new(id);
            if let Some(progress) = default_intro {
                user.map_progress
                    .entry("default".to_string())
                    .or_default()
                    .insert("intro".to_string(), progress);
            }
            if let Some(progress) = other_advanced {
                user.map_progress
                    .entry("https://other.example".to_string())
                    .or_default()
                    .insert("advanced".to_string(), progress);
            }
            user
        })
}

/// Persisted records in any known schema, plus a little junk.
pub fn arb_raw_user() -> impl Strategy<Value = Value> {
    let flat = ("[a-z0-9]{6}", any::<bool>()).prop_map(|(id, done)| {
        json!({
            "version": "0.0.0",
            "id": id,
            "mapProgress": {
                "intro": {
                    "mapId": "intro",
                    "completionState": "incomplete",
                    "activityState": { "basics": { "activityId": "basics", "isCompleted": done } }
                }
            }
        })
    });
    let current =
        arb_user_state().prop_map(|user| serde_json::to_value(user).unwrap_or(Value::Null));
    prop_oneof![
        3 => current,
        2 => flat,
        2 => arb_legacy_user().prop_map(|(raw, _)| raw),
        1 => Just(Value::Null),
        1 => Just(json!([1, 2, 3])),
        1 => Just(json!({ "version": "not-a-version" })),
    ]
}

/// One legacy activity entry, sometimes with unreadable optional fields.
fn arb_legacy_activity() -> impl Strategy<Value = (bool, Value)> {
    (
        any::<bool>(),
        prop_oneof![
            Just(json!(1_700_000_000_000_i64)),
            Just(json!("yesterday")),
            Just(Value::Null),
        ],
        prop_oneof![Just(json!(1)), Just(json!(-3)), Just(json!("two"))],
        prop::option::of("[a-z]{4}"),
    )
        .prop_map(|(done, time, step, header)| {
            let entry = json!({
                "isCompleted": done,
                "completedTime": time,
                "currentStep": step,
                "maxSteps": 4,
                "headerId": header,
            });
            (done, entry)
        })
}

/// A flat-schema map entry: either sparse (completion state only) or full,
/// with known and unknown completion states mixed in.
fn arb_legacy_map_entry() -> impl Strategy<Value = (Value, Vec<String>)> {
    let state = prop::sample::select(&["incomplete", "transitioning", "completed", "finished"][..]);
    let sparse = state
        .clone()
        .prop_map(|state| (json!({ "completionState": state }), Vec::new()));
    let full = (
        state,
        any::<bool>(),
        prop::collection::btree_map("a[0-4]", arb_legacy_activity(), 0..4),
    )
        .prop_map(|(state, with_id, activities)| {
            let completed = activities
                .iter()
                .filter(|(_, (done, _))| *done)
                .map(|(id, _)| id.clone())
                .collect();
            let activity_state: serde_json::Map<String, Value> = activities
                .into_iter()
                .map(|(id, (_, entry))| (id, entry))
                .collect();
            let mut entry = json!({
                "completionState": state,
                "activityState": activity_state,
            });
            if with_id {
                entry["mapId"] = json!("stale-id");
            }
            (entry, completed)
        });
    prop_oneof![1 => sparse, 2 => full]
}

/// Flat-schema records, with or without an explicit version, alongside the
/// `(map, activity)` pairs they record as completed.
pub fn arb_legacy_user() -> impl Strategy<Value = (Value, Vec<(String, String)>)> {
    (
        any::<bool>(),
        prop::collection::btree_map("m[0-3]", arb_legacy_map_entry(), 1..4),
    )
        .prop_map(|(versioned, maps)| {
            let mut completed = Vec::new();
            let mut progress = serde_json::Map::new();
            for (map_id, (entry, done)) in maps {
                completed.extend(done.into_iter().map(|a| (map_id.clone(), a)));
                progress.insert(map_id, entry);
            }
            let mut raw = json!({ "id": "legacy", "mapProgress": progress });
            if versioned {
                raw["version"] = json!("0.0.0");
            }
            (raw, completed)
        })
}
