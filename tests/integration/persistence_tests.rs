//! Learner records written by one session and read back by the next.

use serde_json::json;
use skillmap::core::USER_VERSION;
use skillmap::core::graph::is_activity_completed;
use skillmap::state::{Action, PageSourceStatus, SkillMapState, Store};
use skillmap::storage::{UserStore, load_maps};
use skillmap::test_utils::fixtures::ProgressFixture;

fn session(fixture: &ProgressFixture, source: &str) -> (Store, UserStore) {
    let user_store = UserStore::new(&fixture.user_path);
    let raw = user_store.load_raw().unwrap();
    let document = load_maps(&fixture.maps_path).unwrap();

    let mut store = Store::new(SkillMapState::default());
    store.dispatch(Action::SetPageSourceUrl {
        url: source.to_string(),
        status: PageSourceStatus::Approved,
    });
    store.dispatch_all(document.maps.into_iter().map(Action::AddSkillMap));
    store.dispatch(Action::SetUser(raw.unwrap_or_default()));
    (store, user_store)
}

#[test]
fn progress_survives_a_save_and_reload() {
    let fixture = ProgressFixture::new();

    let (mut store, user_store) = session(&fixture, "default");
    store.dispatch_all([
        Action::open_activity("intro", "basics"),
        Action::CloseActivity { finished: true },
    ]);
    let first_id = store.state().user.id.clone();
    let first_time = store
        .state()
        .user
        .map_progress_for("default", "intro")
        .unwrap()
        .activity_state["basics"]
        .completed_time;
    user_store.save(&store.state().user).unwrap();

    let (reloaded, _) = session(&fixture, "default");
    let user = &reloaded.state().user;
    assert_eq!(user.id, first_id);
    assert!(is_activity_completed(user, "default", "intro", "badge"));
    let reloaded_time = user.map_progress_for("default", "intro").unwrap().activity_state["basics"]
        .completed_time;
    assert_eq!(
        reloaded_time.map(|t| t.timestamp_millis()),
        first_time.map(|t| t.timestamp_millis())
    );
}

#[test]
fn flat_legacy_record_is_upgraded_on_load() {
    let fixture = ProgressFixture::new();
    fixture.write_user(
        &json!({
            "id": "old-learner",
            "mapProgress": {
                "intro": {
                    "completionState": "transitioning",
                    "activityState": {
                        "basics": { "isCompleted": true, "headerId": "h1" },
                        "loops": 7
                    }
                }
            }
        })
        .to_string(),
    );

    let (store, user_store) = session(&fixture, "https://site.example");
    let user = &store.state().user;
    assert_eq!(user.version, USER_VERSION);
    assert_eq!(user.id, "old-learner");
    let intro = user.map_progress_for("https://site.example", "intro").unwrap();
    assert_eq!(intro.activity_state.len(), 1);
    assert_eq!(intro.activity_state["basics"].header_id.as_deref(), Some("h1"));
    assert_eq!(user.completed_tags["https://site.example"]["sprites"], 1);

    user_store.save(user).unwrap();
    let saved = fixture.read_user();
    assert_eq!(saved["version"], USER_VERSION);
    assert!(saved["mapProgress"].get("intro").is_none());
}

#[test]
fn record_from_a_newer_build_keeps_its_progress() {
    let fixture = ProgressFixture::new();
    fixture.write_user(
        &json!({
            "version": "9.0.0",
            "id": "future",
            "futureField": true,
            "mapProgress": {
                "default": {
                    "intro": { "mapId": "intro", "activityState": { "basics": { "activityId": "basics", "isCompleted": true } } }
                }
            }
        })
        .to_string(),
    );

    let (store, _) = session(&fixture, "default");
    let user = &store.state().user;
    assert_eq!(user.version, USER_VERSION);
    assert!(is_activity_completed(user, "default", "intro", "basics"));
}
