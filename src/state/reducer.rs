//! Progress state machine.
//!
//! [`reduce`] maps `(state, action)` to a new state. The input state is never
//! modified; every write lands on a copy and goes through the upsert helpers
//! on [`UserState`].

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::graph::{
    get_completed_tags, get_finished_nodes, is_reward_node, lookup_activity_progress,
};
use crate::core::map::{NodeKind, SkillMap};
use crate::core::migration::{apply_user_migrations, apply_user_upgrades};
use crate::core::progress::{CompletionState, ProgressPath, USER_VERSION, UserState};
use crate::state::{
    Action, DEFAULT_DESCRIPTION, DEFAULT_TITLE, EditorStage, EditorViewState, ModalState,
    SelectedItem, ShareState, SkillGraphTheme, SkillMapState,
};

/// Apply one intent. `now` stamps first-completion times.
#[allow(clippy::too_many_lines)]
pub fn reduce(state: &SkillMapState, action: Action, now: DateTime<Utc>) -> SkillMapState {
    debug!(action = action.name(), source = %state.page_source_url, "reduce");
    let mut next = state.clone();

    match action {
        Action::AddSkillMap(map) => {
            next.maps.insert(map.map_id.clone(), map);
        }
        Action::ClearSkillMaps => next.maps.clear(),
        Action::ClearMetadata => {
            next.title = DEFAULT_TITLE.to_string();
            next.description = DEFAULT_DESCRIPTION.to_string();
            next.info_url = None;
            next.background_image_url = None;
            next.banner_image_url = None;
            next.alternate_source_urls = None;
            next.theme = SkillGraphTheme::default();
        }
        Action::ChangeSelectedItem {
            map_id,
            activity_id,
        } => {
            next.selected_item = Some(SelectedItem {
                map_id,
                activity_id,
            });
        }
        Action::SetSkillMapCompleted { map_id } => {
            next.user
                .upsert_map(&state.page_source_url, &map_id)
                .completion_state
                .advance(CompletionState::Completed);
        }

        Action::OpenActivity {
            map_id,
            activity_id,
            carryover_code,
            previous_header_id,
        } => {
            let current_header_id =
                lookup_activity_progress(&state.user, &state.page_source_url, &map_id, &activity_id)
                    .and_then(|progress| progress.header_id.clone());
            next.editor_view = Some(EditorViewState {
                current_map_id: map_id,
                current_activity_id: activity_id,
                current_header_id,
                allow_code_carryover: carryover_code,
                previous_header_id,
                state: EditorStage::Active,
            });
        }
        Action::SaveAndCloseActivity => match next.editor_view.as_mut() {
            Some(view) => view.state = EditorStage::Saving,
            None => warn!("save-and-close with no open activity"),
        },
        Action::CloseActivity { finished } => close_activity(state, &mut next, finished, now),
        Action::RestartActivity {
            map_id,
            activity_id,
            carryover_code,
            previous_header_id,
        } => {
            next.modal = None;
            let path = ProgressPath::new(&state.page_source_url, &map_id, &activity_id);
            set_header_for_activity(&mut next.user, path, None, None, None, false, now);
            next.editor_view = Some(EditorViewState {
                current_map_id: map_id,
                current_activity_id: activity_id,
                current_header_id: None,
                allow_code_carryover: carryover_code,
                previous_header_id,
                state: EditorStage::Active,
            });
        }
        Action::SetHeaderForActivity {
            map_id,
            activity_id,
            header_id,
            current_step,
            max_steps,
            is_completed,
        } => {
            if let Some(view) = next.editor_view.as_mut() {
                if view.current_map_id == map_id && view.current_activity_id == activity_id {
                    view.current_header_id.clone_from(&header_id);
                }
            }
            let path = ProgressPath::new(&state.page_source_url, &map_id, &activity_id);
            set_header_for_activity(
                &mut next.user,
                path,
                header_id,
                current_step,
                max_steps,
                is_completed,
                now,
            );
        }

        Action::SetUser(raw) => next.user = load_user(state, raw),
        Action::ResetUser => {
            info!(source = %state.page_source_url, "resetting learner progress");
            next.user.clear_source(&state.page_source_url);
        }
        Action::UpdateUserCompletedTags => {
            if !state.page_source_url.is_empty() {
                let tags =
                    get_completed_tags(&state.user, &state.page_source_url, state.maps.values());
                next.user
                    .completed_tags
                    .insert(state.page_source_url.clone(), tags);
            }
        }

        Action::SetShareStatus { header_id, url } => {
            next.share_state = (header_id.is_some() || url.is_some())
                .then_some(ShareState { header_id, url });
        }
        Action::SetPageTitle(title) => next.title = title,
        Action::SetPageDescription(description) => next.description = description,
        Action::SetPageInfoUrl(url) => next.info_url = url,
        Action::SetPageBackgroundImageUrl(url) => next.background_image_url = url,
        Action::SetPageBannerImageUrl(url) => next.banner_image_url = url,
        Action::SetPageTheme(theme) => next.theme = theme,
        Action::SetPageSourceUrl { url, status } => {
            next.page_source_url = url;
            next.page_source_status = status;
        }
        Action::SetPageAlternateUrls(urls) => next.alternate_source_urls = urls,

        Action::ShowModal {
            kind,
            map_id,
            activity_id,
        } => {
            next.modal = Some(ModalState {
                kind,
                current_map_id: map_id,
                current_activity_id: activity_id,
            });
        }
        Action::HideModal => next.modal = None,
        Action::ShowUserProfile => next.show_profile = true,
        Action::HideUserProfile => next.show_profile = false,
        Action::SetUserProfile(profile) => {
            next.auth.signed_in = profile
                .as_ref()
                .and_then(|p| p.id.as_deref())
                .is_some_and(|id| !id.is_empty());
            next.auth.profile = profile;
        }
        Action::SetUserPreferences(preferences) => next.auth.preferences = preferences,
        Action::UserLogOut => next.auth.signed_in = false,
    }

    next
}

/// Whether an activity may start from the previous activity's project.
pub fn should_allow_code_carryover(state: &SkillMapState, map_id: &str, activity_id: &str) -> bool {
    state
        .map(map_id)
        .and_then(|map| map.node(activity_id))
        .is_some_and(|node| node.kind == NodeKind::Activity && node.allow_code_carryover)
}

fn close_activity(
    state: &SkillMapState,
    next: &mut SkillMapState,
    finished: bool,
    now: DateTime<Utc>,
) {
    let Some(view) = next.editor_view.take() else {
        warn!("close-activity with no open activity");
        return;
    };
    if !finished {
        return;
    }
    let Some(map) = state.map(&view.current_map_id) else {
        warn!(map_id = %view.current_map_id, "closed activity belongs to a map that is not loaded");
        return;
    };

    let source = state.page_source_url.as_str();
    let finished_nodes = get_finished_nodes(map, &view.current_activity_id);

    if let Some(reward) = finished_nodes.iter().find(|node| is_reward_node(node)) {
        if lookup_activity_progress(&state.user, source, &map.map_id, &reward.activity_id)
            .is_none()
        {
            next.selected_item = Some(SelectedItem {
                map_id: map.map_id.clone(),
                activity_id: reward.activity_id.clone(),
            });
        }
    }

    let ids: Vec<&str> = finished_nodes
        .iter()
        .map(|node| node.activity_id.as_str())
        .collect();
    set_activity_finished(&mut next.user, source, map, &ids, now);
}

/// Upsert one activity record. Completion is OR'd, never cleared.
fn set_header_for_activity(
    user: &mut UserState,
    path: ProgressPath<'_>,
    header_id: Option<String>,
    current_step: Option<u32>,
    max_steps: Option<u32>,
    is_completed: bool,
    now: DateTime<Utc>,
) {
    let entry = user.upsert_activity(path);
    entry.header_id = header_id;
    entry.current_step = current_step;
    entry.max_steps = max_steps;
    if is_completed {
        entry.mark_completed(now);
    }
}

/// Complete every node in `activity_ids`, advancing the map to
/// `transitioning` the first time a reward node is reached.
fn set_activity_finished(
    user: &mut UserState,
    source: &str,
    map: &SkillMap,
    activity_ids: &[&str],
    now: DateTime<Utc>,
) {
    let mut should_transition = false;

    for &activity_id in activity_ids {
        let path = ProgressPath::new(source, &map.map_id, activity_id);
        let was_completed = user.activity_progress(path).is_some_and(|s| s.is_completed);
        let is_reward = map.node(activity_id).is_some_and(is_reward_node);
        should_transition |= is_reward && !was_completed;
        user.upsert_activity(path).mark_completed(now);
    }

    if should_transition {
        debug!(map_id = %map.map_id, "reward reached; map transitioning");
        user.upsert_map(source, &map.map_id)
            .completion_state
            .advance(CompletionState::Transitioning);
    }
}

/// Upgrade, migrate, then back-fill an empty record for every loaded map.
fn load_user(state: &SkillMapState, raw: serde_json::Value) -> UserState {
    let source = state.page_source_url.as_str();
    let mut user = apply_user_upgrades(raw, USER_VERSION, source, state.maps.values());

    if let Some(alternates) = &state.alternate_source_urls {
        user = apply_user_migrations(user, source, alternates);
    }

    user.map_progress.entry(source.to_string()).or_default();
    for map_id in state.maps.keys() {
        user.upsert_map(source, map_id);
    }

    info!(user = %user.id, source, maps = state.maps.len(), "user loaded");
    user
}
