//! skillmap migrate - Upgrade a saved learner record to the current schema.

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::ProgressFiles;
use crate::cli::commands::open_session;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::core::progress::USER_VERSION;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub files: ProgressFiles,

    /// Check for a required migration without writing
    #[arg(long)]
    pub check: bool,
}

#[derive(Serialize, Debug)]
struct MigrationReport {
    path: String,
    found: bool,
    from_version: Option<String>,
    to_version: String,
    changed: bool,
    written: bool,
}

pub fn run(ctx: &AppContext, args: &MigrateArgs) -> Result<()> {
    let session = open_session(ctx, &args.files)?;

    let from_version = session.raw_user.as_ref().map(|raw| {
        raw.get("version")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("0.0.0")
            .to_string()
    });
    let changed = from_version
        .as_deref()
        .is_some_and(|version| version != USER_VERSION);
    let written = changed && !args.check;

    if written {
        session.save()?;
        info!(
            from = from_version.as_deref().unwrap_or("none"),
            to = USER_VERSION,
            "learner record migrated"
        );
    }

    let report = MigrationReport {
        path: session.user_store.path().display().to_string(),
        found: session.raw_user.is_some(),
        from_version,
        to_version: USER_VERSION.to_string(),
        changed,
        written,
    };

    if ctx.robot_mode {
        return emit_json(&robot_ok(&report));
    }

    let status = match (report.found, report.changed, report.written) {
        (false, _, _) => "no saved record",
        (true, false, _) => "current",
        (true, true, false) => "needs migration",
        (true, true, true) => "migrated",
    };

    let mut layout = HumanLayout::new();
    layout.title("Learner Record Migration");
    layout
        .kv("Path", &report.path)
        .kv("From", report.from_version.as_deref().unwrap_or("-"))
        .kv("To", &report.to_version)
        .kv("Status", status);
    emit_human(layout);
    Ok(())
}
