//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command
//!
//! Commands share one flow: build a [`Store`] for the active page source,
//! feed it the loaded maps and the saved learner record, dispatch intents,
//! then save the resulting [`UserState`](crate::core::UserState).

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::{Commands, ProgressFiles};
use crate::error::{Result, SkillMapError};
use crate::state::{Action, PageSourceStatus, SkillMapState, Store};
use crate::storage::{MapDocument, UserStore, load_maps};

pub mod complete;
pub mod migrate;
pub mod reset;
pub mod status;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Status(args) => status::run(ctx, args),
        Commands::Migrate(args) => migrate::run(ctx, args),
        Commands::Complete(args) => complete::run(ctx, args),
        Commands::Reset(args) => reset::run(ctx, args),
    }
}

/// A loaded store plus where its learner record lives.
pub(crate) struct Session {
    pub store: Store,
    pub user_store: UserStore,
    /// Raw record as found on disk, before upgrading.
    pub raw_user: Option<Value>,
}

impl Session {
    pub fn state(&self) -> &SkillMapState {
        self.store.state()
    }

    pub fn save(&self) -> Result<()> {
        self.user_store.save(&self.store.state().user)
    }
}

pub(crate) fn open_session(ctx: &AppContext, files: &ProgressFiles) -> Result<Session> {
    let document = match resolve_maps_path(ctx, files.maps.as_deref()) {
        Some(path) => load_maps(&path)?,
        None => MapDocument::default(),
    };
    open_session_with(ctx, files.user.as_deref(), document)
}

/// Like [`open_session`] but fails when no map document is configured.
pub(crate) fn open_session_requiring_maps(
    ctx: &AppContext,
    files: &ProgressFiles,
) -> Result<Session> {
    let path = resolve_maps_path(ctx, files.maps.as_deref())
        .ok_or_else(|| SkillMapError::MissingConfig("storage.maps_path".to_string()))?;
    open_session_with(ctx, files.user.as_deref(), load_maps(&path)?)
}

fn open_session_with(
    ctx: &AppContext,
    user_path: Option<&Path>,
    document: MapDocument,
) -> Result<Session> {
    let user_store = UserStore::new(resolve_user_path(ctx, user_path));
    let raw_user = user_store.load_raw()?;
    debug!(
        user_path = %user_store.path().display(),
        found = raw_user.is_some(),
        maps = document.maps.len(),
        "opening session"
    );

    let mut store = Store::new(SkillMapState::default());
    store.dispatch(Action::SetPageSourceUrl {
        url: ctx.source_url.clone(),
        status: PageSourceStatus::Approved,
    });
    if !ctx.config.source.alternate_urls.is_empty() {
        store.dispatch(Action::SetPageAlternateUrls(Some(
            ctx.config.source.alternate_urls.clone(),
        )));
    }
    if let Some(title) = document.title {
        store.dispatch(Action::SetPageTitle(title));
    }
    if let Some(description) = document.description {
        store.dispatch(Action::SetPageDescription(description));
    }
    store.dispatch_all(document.maps.into_iter().map(Action::AddSkillMap));
    store.dispatch(Action::SetUser(raw_user.clone().unwrap_or(Value::Null)));
    store.dispatch(Action::UpdateUserCompletedTags);

    Ok(Session {
        store,
        user_store,
        raw_user,
    })
}

fn resolve_maps_path(ctx: &AppContext, explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| ctx.config.storage.maps_path.clone())
}

fn resolve_user_path(ctx: &AppContext, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.config.storage.resolved_user_path())
}
