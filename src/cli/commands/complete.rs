//! skillmap complete - Finish an activity and record the result.

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::ProgressFiles;
use crate::cli::commands::open_session_requiring_maps;
use crate::cli::output::{HumanLayout, completion_label, emit_human, emit_json, robot_ok};
use crate::core::graph::{get_finished_nodes, is_map_completed};
use crate::core::progress::CompletionState;
use crate::error::{Result, SkillMapError};
use crate::state::{Action, should_allow_code_carryover};

#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Map id
    pub map_id: String,

    /// Activity id within the map
    pub activity_id: String,

    #[command(flatten)]
    pub files: ProgressFiles,
}

#[derive(Serialize, Debug)]
struct CompletionReport {
    map_id: String,
    activity_id: String,
    /// The activity plus any reward nodes that completed with it.
    finished: Vec<String>,
    completion_state: CompletionState,
    completed_time: Option<i64>,
}

pub fn run(ctx: &AppContext, args: &CompleteArgs) -> Result<()> {
    let mut session = open_session_requiring_maps(ctx, &args.files)?;

    let finished: Vec<String> = {
        let state = session.state();
        let map = state
            .map(&args.map_id)
            .ok_or_else(|| SkillMapError::MapNotFound(args.map_id.clone()))?;
        if map.node(&args.activity_id).is_none() {
            return Err(SkillMapError::ActivityNotFound {
                map_id: args.map_id.clone(),
                activity_id: args.activity_id.clone(),
            });
        }
        get_finished_nodes(map, &args.activity_id)
            .into_iter()
            .map(|node| node.activity_id.clone())
            .collect()
    };

    let carryover = should_allow_code_carryover(session.state(), &args.map_id, &args.activity_id);
    session.store.dispatch_all([
        Action::OpenActivity {
            map_id: args.map_id.clone(),
            activity_id: args.activity_id.clone(),
            carryover_code: carryover,
            previous_header_id: None,
        },
        Action::CloseActivity { finished: true },
        Action::UpdateUserCompletedTags,
    ]);

    let state = session.state();
    let source = state.page_source_url.as_str();
    let map_done = state
        .map(&args.map_id)
        .is_some_and(|map| {
            is_map_completed(map, state.user.map_progress_for(source, &args.map_id))
        });
    if map_done {
        session.store.dispatch(Action::SetSkillMapCompleted {
            map_id: args.map_id.clone(),
        });
    }
    session.save()?;

    let state = session.state();
    let source = state.page_source_url.as_str();
    let progress = state.user.map_progress_for(source, &args.map_id);
    let report = CompletionReport {
        map_id: args.map_id.clone(),
        activity_id: args.activity_id.clone(),
        finished,
        completion_state: progress.map(|p| p.completion_state).unwrap_or_default(),
        completed_time: progress
            .and_then(|p| p.activity_state.get(&args.activity_id))
            .and_then(|s| s.completed_time)
            .map(|t| t.timestamp_millis()),
    };
    info!(
        map_id = %report.map_id,
        activity_id = %report.activity_id,
        state = %report.completion_state,
        "activity completed"
    );

    if ctx.robot_mode {
        return emit_json(&robot_ok(&report));
    }

    let mut layout = HumanLayout::new();
    layout.title("Activity Completed");
    layout
        .kv("Map", &report.map_id)
        .kv("Activity", &report.activity_id)
        .kv("Map state", &completion_label(report.completion_state));
    if report.finished.len() > 1 {
        layout.blank().section("Also completed");
        for id in report.finished.iter().skip(1) {
            layout.bullet(id);
        }
    }
    emit_human(layout);
    Ok(())
}
