//! Read-only queries over skill map graphs and learner progress.
//!
//! Nothing here mutates state. Missing progress at any level of the
//! source → map → activity nesting is reported as absence, never as an error.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::core::map::{MapNode, NodeKind, SkillMap};
use crate::core::progress::{ActivityState, MapProgress, ProgressPath, TagCounts, UserState};

/// Display status of a node for a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Locked,
    NotStarted,
    InProgress,
    Completed,
    /// Completed once, currently being replayed.
    Restarted,
}

/// Reward and completion nodes are never practiced; they complete on arrival.
pub fn is_reward_node(node: &MapNode) -> bool {
    matches!(node.kind, NodeKind::Reward | NodeKind::Completion)
}

pub fn lookup_activity_progress<'a>(
    user: &'a UserState,
    source: &str,
    map_id: &str,
    activity_id: &str,
) -> Option<&'a ActivityState> {
    user.activity_progress(ProgressPath::new(source, map_id, activity_id))
}

pub fn is_activity_completed(
    user: &UserState,
    source: &str,
    map_id: &str,
    activity_id: &str,
) -> bool {
    lookup_activity_progress(user, source, map_id, activity_id).is_some_and(|s| s.is_completed)
}

/// Nodes reachable from the map root, in breadth-first order.
pub fn reachable_nodes(map: &SkillMap) -> Vec<&MapNode> {
    let mut ordered = Vec::new();
    let Some(root) = map.root_node() else {
        return ordered;
    };

    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([root]);
    seen.insert(root.activity_id.as_str());

    while let Some(node) = queue.pop_front() {
        ordered.push(node);
        for next in map.successors(node) {
            if seen.insert(next.activity_id.as_str()) {
                queue.push_back(next);
            }
        }
    }
    ordered
}

/// True when every non-reward node reachable from the root is completed.
pub fn is_map_completed(map: &SkillMap, progress: Option<&MapProgress>) -> bool {
    reachable_nodes(map)
        .into_iter()
        .filter(|node| !is_reward_node(node))
        .all(|node| {
            progress
                .and_then(|p| p.activity_state.get(&node.activity_id))
                .is_some_and(|s| s.is_completed)
        })
}

/// The finished node followed by its direct reward/completion successors.
///
/// Exactly one hop: rewards that follow a reward are not included.
pub fn get_finished_nodes<'a>(map: &'a SkillMap, activity_id: &str) -> Vec<&'a MapNode> {
    let Some(node) = map.node(activity_id) else {
        return Vec::new();
    };
    std::iter::once(node)
        .chain(map.successors(node).filter(|next| is_reward_node(next)))
        .collect()
}

/// Count completed activities per tag across `maps` for one source.
pub fn get_completed_tags<'a, I>(user: &UserState, source: &str, maps: I) -> TagCounts
where
    I: IntoIterator<Item = &'a SkillMap>,
{
    let mut tags = TagCounts::new();
    for map in maps {
        for node in map.activities.values() {
            if node.kind != NodeKind::Activity || node.tags.is_empty() {
                continue;
            }
            if !is_activity_completed(user, source, &map.map_id, &node.activity_id) {
                continue;
            }
            for tag in &node.tags {
                *tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }
    tags
}

/// The root is always unlocked; other nodes unlock once any parent is done.
pub fn is_activity_unlocked(
    user: &UserState,
    source: &str,
    map: &SkillMap,
    activity_id: &str,
) -> bool {
    if map.root == activity_id {
        return true;
    }
    map.parents(activity_id)
        .any(|parent| is_activity_completed(user, source, &map.map_id, &parent.activity_id))
}

pub fn get_activity_status(
    user: &UserState,
    source: &str,
    map: &SkillMap,
    activity_id: &str,
) -> ActivityStatus {
    let base = if is_activity_unlocked(user, source, map, activity_id) {
        ActivityStatus::NotStarted
    } else {
        ActivityStatus::Locked
    };

    match lookup_activity_progress(user, source, &map.map_id, activity_id) {
        Some(progress) if progress.is_completed => {
            match (progress.current_step, progress.max_steps) {
                (Some(step), Some(max)) if step > 0 && step < max => ActivityStatus::Restarted,
                _ => ActivityStatus::Completed,
            }
        }
        Some(progress) if progress.header_id.as_deref().is_some_and(|h| !h.is_empty()) => {
            ActivityStatus::InProgress
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progress::ProgressPath;

    const SRC: &str = "default";

    fn cascade_map() -> SkillMap {
        SkillMap::new(
            "map1",
            vec![
                MapNode::activity("a").with_next(["b"]).with_tags(["loops"]),
                MapNode::reward("b").with_next(["c"]),
                MapNode::activity("c").with_next(["done"]).with_tags(["loops", "sprites"]),
                MapNode::completion("done"),
            ],
        )
    }

    fn complete(user: &mut UserState, map_id: &str, activity_id: &str) {
        user.upsert_activity(ProgressPath::new(SRC, map_id, activity_id))
            .is_completed = true;
    }

    #[test]
    fn reward_and_completion_are_reward_nodes() {
        assert!(is_reward_node(&MapNode::reward("r")));
        assert!(is_reward_node(&MapNode::completion("c")));
        assert!(!is_reward_node(&MapNode::activity("a")));
    }

    #[test]
    fn lookup_missing_levels_is_absent() {
        let mut user = UserState::new("u");
        assert!(lookup_activity_progress(&user, SRC, "map1", "a").is_none());
        user.upsert_map(SRC, "map1");
        assert!(lookup_activity_progress(&user, SRC, "map1", "a").is_none());
        assert!(lookup_activity_progress(&user, "other", "map1", "a").is_none());
    }

    #[test]
    fn finished_nodes_stop_after_one_hop() {
        let map = cascade_map();
        let ids: Vec<_> = get_finished_nodes(&map, "a")
            .iter()
            .map(|n| n.activity_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(get_finished_nodes(&map, "missing").is_empty());
    }

    #[test]
    fn map_completed_ignores_reward_nodes() {
        let map = cascade_map();
        let mut user = UserState::new("u");
        assert!(!is_map_completed(&map, user.map_progress_for(SRC, "map1")));

        complete(&mut user, "map1", "a");
        assert!(!is_map_completed(&map, user.map_progress_for(SRC, "map1")));

        complete(&mut user, "map1", "c");
        assert!(is_map_completed(&map, user.map_progress_for(SRC, "map1")));
    }

    #[test]
    fn map_completed_only_considers_reachable_nodes() {
        let mut map = cascade_map();
        map.activities
            .insert("orphan".to_string(), MapNode::activity("orphan"));
        let mut user = UserState::new("u");
        complete(&mut user, "map1", "a");
        complete(&mut user, "map1", "c");
        assert!(is_map_completed(&map, user.map_progress_for(SRC, "map1")));
    }

    #[test]
    fn completed_tags_counts_per_tag() {
        let map = cascade_map();
        let mut user = UserState::new("u");
        complete(&mut user, "map1", "a");
        complete(&mut user, "map1", "c");

        let tags = get_completed_tags(&user, SRC, [&map]);
        assert_eq!(tags.get("loops"), Some(&2));
        assert_eq!(tags.get("sprites"), Some(&1));
        assert!(get_completed_tags(&user, "other", [&map]).is_empty());
    }

    #[test]
    fn unlock_follows_completed_parents() {
        let map = cascade_map();
        let mut user = UserState::new("u");
        assert!(is_activity_unlocked(&user, SRC, &map, "a"));
        assert!(!is_activity_unlocked(&user, SRC, &map, "c"));

        complete(&mut user, "map1", "b");
        assert!(is_activity_unlocked(&user, SRC, &map, "c"));
    }

    #[test]
    fn activity_status_transitions() {
        let map = cascade_map();
        let mut user = UserState::new("u");
        assert_eq!(get_activity_status(&user, SRC, &map, "a"), ActivityStatus::NotStarted);
        assert_eq!(get_activity_status(&user, SRC, &map, "c"), ActivityStatus::Locked);

        user.upsert_activity(ProgressPath::new(SRC, "map1", "a")).header_id = Some("h".into());
        assert_eq!(get_activity_status(&user, SRC, &map, "a"), ActivityStatus::InProgress);

        user.upsert_activity(ProgressPath::new(SRC, "map1", "a")).header_id = Some(String::new());
        assert_eq!(get_activity_status(&user, SRC, &map, "a"), ActivityStatus::NotStarted);

        complete(&mut user, "map1", "a");
        assert_eq!(get_activity_status(&user, SRC, &map, "a"), ActivityStatus::Completed);

        let state = user.upsert_activity(ProgressPath::new(SRC, "map1", "a"));
        state.current_step = Some(2);
        state.max_steps = Some(5);
        assert_eq!(get_activity_status(&user, SRC, &map, "a"), ActivityStatus::Restarted);
    }
}
