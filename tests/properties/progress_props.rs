use proptest::prelude::*;

use skillmap::core::migration::apply_user_migrations;
use skillmap::core::progress::{ProgressPath, UserState};
use skillmap::state::{Action, PageSourceStatus, SkillMapState, reduce};
use skillmap::test_utils::fixtures::fixed_now;

const SOURCES: &[&str] = &["default", "https://a.example", "https://b.example"];

/// (source, map, activity, completed, header)
type Entry = (String, String, String, bool, Option<String>);

fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        prop::sample::select(SOURCES).prop_map(str::to_string),
        "m[0-3]",
        "a[0-5]",
        any::<bool>(),
        prop::option::of("[a-z]{4}"),
    )
}

fn user_from(entries: &[Entry]) -> UserState {
    let mut user = UserState::new("learner");
    for (source, map_id, activity_id, completed, header) in entries {
        let state = user.upsert_activity(ProgressPath::new(source, map_id, activity_id));
        state.is_completed |= *completed;
        state.header_id.clone_from(header);
    }
    user
}

proptest! {
    #[test]
    fn reset_touches_only_the_active_source(
        entries in prop::collection::vec(arb_entry(), 0..30),
        active in prop::sample::select(SOURCES),
    ) {
        let mut state = SkillMapState::with_user(user_from(&entries));
        state = reduce(
            &state,
            Action::SetPageSourceUrl {
                url: active.to_string(),
                status: PageSourceStatus::Approved,
            },
            fixed_now(),
        );
        let before = state.user.clone();
        let after = reduce(&state, Action::ResetUser, fixed_now()).user;

        prop_assert!(after.source_progress(active).is_some_and(|maps| maps.is_empty()));
        for source in SOURCES.iter().filter(|s| **s != active) {
            prop_assert_eq!(after.source_progress(source), before.source_progress(source));
            prop_assert_eq!(after.completed_tags.get(*source), before.completed_tags.get(*source));
        }
    }

    #[test]
    fn migration_never_overwrites_active_progress(
        entries in prop::collection::vec(arb_entry(), 0..30),
    ) {
        let user = user_from(&entries);
        let active = "default";
        let alternates = vec!["https://a.example".to_string(), "https://b.example".to_string()];
        let migrated = apply_user_migrations(user.clone(), active, &alternates);

        if let Some(existing) = user.source_progress(active) {
            for (map_id, progress) in existing {
                prop_assert_eq!(migrated.map_progress_for(active, map_id), Some(progress));
            }
        }
        for alternate in &alternates {
            prop_assert_eq!(migrated.source_progress(alternate), user.source_progress(alternate));
            for map_id in user.source_progress(alternate).into_iter().flat_map(|m| m.keys()) {
                prop_assert!(migrated.map_progress_for(active, map_id).is_some());
            }
        }
    }

    #[test]
    fn migration_is_idempotent(entries in prop::collection::vec(arb_entry(), 0..30)) {
        let alternates = vec!["https://a.example".to_string()];
        let once = apply_user_migrations(user_from(&entries), "default", &alternates);
        let twice = apply_user_migrations(once.clone(), "default", &alternates);
        prop_assert_eq!(once, twice);
    }
}
