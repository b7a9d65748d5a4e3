//! Learner journeys driven through the store, checked end to end.

use chrono::Duration;
use skillmap::core::graph::{ActivityStatus, get_activity_status, is_activity_completed};
use skillmap::core::map::{MapNode, SkillMap};
use skillmap::core::progress::{CompletionState, ProgressPath, UserState};
use skillmap::core::is_map_completed;
use skillmap::state::{
    Action, EditorStage, FixedClock, ModalType, PageSourceStatus, SkillMapState, Store, reduce,
};
use skillmap::test_utils::fixtures::{fixed_now, sample_state};

fn store() -> Store<FixedClock> {
    Store::with_clock(sample_state(), FixedClock(fixed_now()))
}

#[test]
fn opening_an_activity_without_progress() {
    let mut store = store();
    let state = store.dispatch(Action::open_activity("intro", "basics"));

    let view = state.editor_view.as_ref().unwrap();
    assert_eq!(view.state, EditorStage::Active);
    assert_eq!(view.current_map_id, "intro");
    assert!(view.current_header_id.is_none());
}

#[test]
fn finishing_an_activity_before_a_reward() {
    let mut store = store();
    store.dispatch_all([
        Action::open_activity("intro", "basics"),
        Action::set_header("intro", "basics", Some("hdr-1"), Some(3), Some(10), false),
        Action::CloseActivity { finished: true },
    ]);
    let state = store.state();
    let user = &state.user;

    assert!(is_activity_completed(user, "default", "intro", "basics"));
    assert!(is_activity_completed(user, "default", "intro", "badge"));
    assert!(!is_activity_completed(user, "default", "intro", "loops"));
    assert_eq!(
        user.map_progress_for("default", "intro").unwrap().completion_state,
        CompletionState::Transitioning
    );
    assert!(state.editor_view.is_none());

    let basics = &user.map_progress_for("default", "intro").unwrap().activity_state["basics"];
    assert_eq!(basics.header_id.as_deref(), Some("hdr-1"));
    assert_eq!(basics.current_step, Some(3));
    assert_eq!(basics.completed_time, Some(fixed_now()));

    let selected = state.selected_item.as_ref().unwrap();
    assert_eq!(selected.activity_id, "badge");
}

#[test]
fn restarting_a_completed_activity_keeps_completion() {
    let mut store = store();
    store.dispatch_all([
        Action::open_activity("intro", "basics"),
        Action::set_header("intro", "basics", Some("hdr-1"), None, None, false),
        Action::CloseActivity { finished: true },
        Action::show_activity_modal(ModalType::RestartWarning, "intro", "basics"),
        Action::restart_activity("intro", "basics"),
    ]);
    let state = store.state();

    assert!(state.modal.is_none());
    let basics = &state
        .user
        .map_progress_for("default", "intro")
        .unwrap()
        .activity_state["basics"];
    assert!(basics.header_id.is_none());
    assert!(basics.is_completed);
    assert_eq!(state.editor_view.as_ref().unwrap().current_header_id, None);
}

#[test]
fn completion_time_is_kept_from_first_finish() {
    let first = fixed_now();
    let mut state = sample_state();
    for (offset, action) in [
        (0, Action::open_activity("intro", "basics")),
        (0, Action::CloseActivity { finished: true }),
        (60, Action::open_activity("intro", "basics")),
        (60, Action::CloseActivity { finished: true }),
    ] {
        state = reduce(&state, action, first + Duration::seconds(offset));
    }

    let basics = &state
        .user
        .map_progress_for("default", "intro")
        .unwrap()
        .activity_state["basics"];
    assert_eq!(basics.completed_time, Some(first));
}

#[test]
fn walking_the_whole_map() {
    let mut store = store();
    for activity in ["basics", "loops", "events"] {
        store.dispatch_all([
            Action::open_activity("intro", activity),
            Action::CloseActivity { finished: true },
        ]);
    }
    store.dispatch(Action::UpdateUserCompletedTags);
    let state = store.state();
    let user = &state.user;

    assert!(is_activity_completed(user, "default", "intro", "done"));
    let map = state.map("intro").unwrap();
    assert!(is_map_completed(map, user.map_progress_for("default", "intro")));
    assert_eq!(user.completed_tags["default"]["sprites"], 1);
    assert_eq!(user.completed_tags["default"]["loops"], 1);
}

#[test]
fn statuses_follow_progress() {
    let mut store = store();
    let status_of = |store: &Store<FixedClock>, id: &str| {
        let state = store.state();
        get_activity_status(&state.user, "default", state.map("intro").unwrap(), id)
    };

    assert_eq!(status_of(&store, "basics"), ActivityStatus::NotStarted);
    assert_eq!(status_of(&store, "loops"), ActivityStatus::Locked);

    store.dispatch(Action::set_header("intro", "basics", Some("h"), None, None, false));
    assert_eq!(status_of(&store, "basics"), ActivityStatus::InProgress);

    store.dispatch_all([
        Action::open_activity("intro", "basics"),
        Action::CloseActivity { finished: true },
    ]);
    assert_eq!(status_of(&store, "basics"), ActivityStatus::Completed);
    assert_eq!(status_of(&store, "loops"), ActivityStatus::NotStarted);
}

#[test]
fn reset_leaves_other_sources_alone() {
    let mut store = store();
    store.dispatch_all([
        Action::open_activity("intro", "basics"),
        Action::CloseActivity { finished: true },
        Action::SetPageSourceUrl {
            url: "https://other.example".into(),
            status: PageSourceStatus::Approved,
        },
        Action::open_activity("intro", "basics"),
        Action::CloseActivity { finished: true },
        Action::ResetUser,
    ]);
    let user = &store.state().user;

    assert!(!is_activity_completed(user, "https://other.example", "intro", "basics"));
    assert!(is_activity_completed(user, "default", "intro", "basics"));
}

#[test]
fn loading_a_user_migrates_from_alternate_sources() {
    let mut legacy = UserState::new("learner");
    legacy
        .upsert_activity(ProgressPath::new("https://old.example", "intro", "basics"))
        .is_completed = true;
    let raw = serde_json::to_value(&legacy).unwrap();

    let mut store = Store::with_clock(SkillMapState::default(), FixedClock(fixed_now()));
    store.dispatch_all([
        Action::SetPageSourceUrl {
            url: "https://new.example".into(),
            status: PageSourceStatus::Approved,
        },
        Action::SetPageAlternateUrls(Some(vec!["https://old.example".into()])),
        Action::AddSkillMap(SkillMap::new("advanced", vec![MapNode::activity("physics")])),
        Action::SetUser(raw),
    ]);
    let user = &store.state().user;

    assert_eq!(user.id, "learner");
    assert!(is_activity_completed(user, "https://new.example", "intro", "basics"));
    assert!(user.map_progress_for("https://new.example", "advanced").is_some());
    assert!(is_activity_completed(user, "https://old.example", "intro", "basics"));
}

#[test]
fn close_without_open_activity_is_ignored() {
    let mut store = store();
    let before = store.state().clone();
    store.dispatch(Action::CloseActivity { finished: true });
    assert_eq!(store.state(), &before);
}
