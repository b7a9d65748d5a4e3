//! skillmap reset - Clear progress recorded under the active page source.
//!
//! Progress under other page sources is left untouched.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::ProgressFiles;
use crate::cli::commands::open_session;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::state::Action;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Learner record (default: storage.user_path)
    #[arg(long)]
    pub user: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &ResetArgs) -> Result<()> {
    let files = ProgressFiles {
        maps: None,
        user: args.user.clone(),
    };
    let mut session = open_session(ctx, &files)?;
    let cleared_maps = session
        .state()
        .user
        .source_progress(&ctx.source_url)
        .map_or(0, |maps| maps.len());

    session.store.dispatch(Action::ResetUser);
    session.save()?;

    if ctx.robot_mode {
        return emit_json(&robot_ok(json!({
            "source": ctx.source_url,
            "cleared_maps": cleared_maps,
            "path": session.user_store.path().display().to_string(),
        })));
    }

    let mut layout = HumanLayout::new();
    layout.title("Progress Reset");
    layout
        .kv("Source", &ctx.source_url)
        .kv("Maps cleared", &cleared_maps.to_string());
    emit_human(layout);
    Ok(())
}
