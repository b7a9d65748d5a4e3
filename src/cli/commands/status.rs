//! skillmap status - Show per-map completion for the active page source.

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::ProgressFiles;
use crate::cli::commands::open_session_requiring_maps;
use crate::cli::output::{
    HumanLayout, completion_label, emit_human, emit_json, robot_ok, status_label,
};
use crate::core::graph::{ActivityStatus, get_activity_status, is_map_completed, reachable_nodes};
use crate::core::map::NodeKind;
use crate::core::progress::CompletionState;
use crate::error::Result;
use crate::state::SkillMapState;

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub files: ProgressFiles,

    /// Also list every node with its status
    #[arg(long)]
    pub activities: bool,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct MapStatus {
    pub map_id: String,
    pub display_name: String,
    pub completion_state: CompletionState,
    /// Every reachable activity is completed.
    pub all_activities_completed: bool,
    pub completed: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<NodeStatus>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct NodeStatus {
    pub activity_id: String,
    pub kind: NodeKind,
    pub status: ActivityStatus,
}

#[derive(Serialize, Debug)]
pub struct StatusReport {
    pub user_id: String,
    pub source: String,
    pub maps: Vec<MapStatus>,
    pub completed_tags: Vec<(String, u32)>,
}

pub fn run(ctx: &AppContext, args: &StatusArgs) -> Result<()> {
    let session = open_session_requiring_maps(ctx, &args.files)?;
    let report = build_report(session.state(), args.activities);

    if ctx.robot_mode {
        return emit_json(&robot_ok(&report));
    }

    let mut layout = HumanLayout::new();
    layout.title(&session.state().title);
    layout.kv("Learner", &report.user_id);
    layout.kv("Source", &report.source);
    layout.blank();

    for map in &report.maps {
        layout
            .section(&map.display_name)
            .kv("Map", &map.map_id)
            .kv("State", &completion_label(map.completion_state))
            .kv("Activities", &format!("{}/{}", map.completed, map.total));
        for node in &map.activities {
            layout.bullet(&format!("{} ({})", node.activity_id, status_label(node.status)));
        }
        layout.blank();
    }

    if !report.completed_tags.is_empty() {
        layout.section("Completed tags");
        for (tag, count) in &report.completed_tags {
            layout.kv(tag, &count.to_string());
        }
    }

    emit_human(layout);
    Ok(())
}

/// Summarize every loaded map, sorted by map id.
pub fn build_report(state: &SkillMapState, with_activities: bool) -> StatusReport {
    let source = state.page_source_url.as_str();
    let user = &state.user;

    let maps = state
        .sorted_maps()
        .into_iter()
        .map(|map| {
            let progress = user.map_progress_for(source, &map.map_id);
            let practicable: Vec<_> = reachable_nodes(map)
                .into_iter()
                .filter(|node| node.kind == NodeKind::Activity)
                .collect();
            let completed = practicable
                .iter()
                .filter(|node| {
                    progress
                        .and_then(|p| p.activity_state.get(&node.activity_id))
                        .is_some_and(|s| s.is_completed)
                })
                .count();

            let activities = if with_activities {
                reachable_nodes(map)
                    .into_iter()
                    .map(|node| NodeStatus {
                        activity_id: node.activity_id.clone(),
                        kind: node.kind,
                        status: get_activity_status(user, source, map, &node.activity_id),
                    })
                    .collect()
            } else {
                Vec::new()
            };

            MapStatus {
                map_id: map.map_id.clone(),
                display_name: map.display_name.clone(),
                completion_state: progress.map(|p| p.completion_state).unwrap_or_default(),
                all_activities_completed: is_map_completed(map, progress),
                completed,
                total: practicable.len(),
                activities,
            }
        })
        .collect();

    let mut completed_tags: Vec<(String, u32)> = user
        .completed_tags
        .get(source)
        .map(|tags| tags.iter().map(|(tag, count)| (tag.clone(), *count)).collect())
        .unwrap_or_default();
    completed_tags.sort();

    StatusReport {
        user_id: user.id.clone(),
        source: source.to_string(),
        maps,
        completed_tags,
    }
}
