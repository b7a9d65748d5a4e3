//! Learner progress records.
//!
//! [`UserState`] is the only persisted entity. Progress is namespaced by page
//! source url, then by map id, then by activity id. All writes go through the
//! upsert helpers on [`UserState`] so the default for each missing level is
//! defined in exactly one place.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current persisted schema version of [`UserState`].
pub const USER_VERSION: &str = "0.0.2";

/// Progress maps for one page source, keyed by map id.
pub type SourceProgress = HashMap<String, MapProgress>;

/// Completed tag counts for one page source.
pub type TagCounts = HashMap<String, u32>;

/// Progress through a single activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityState {
    pub activity_id: String,
    /// Once true, never reverts.
    #[serde(default)]
    pub is_completed: bool,
    /// Saved project reference for this activity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u32>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_time: Option<DateTime<Utc>>,
}

impl ActivityState {
    pub fn new(activity_id: impl Into<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            is_completed: false,
            header_id: None,
            current_step: None,
            max_steps: None,
            completed_time: None,
        }
    }

    /// Mark complete, stamping `completed_time` only on the first completion.
    pub fn mark_completed(&mut self, now: DateTime<Utc>) {
        self.is_completed = true;
        if self.completed_time.is_none() {
            self.completed_time = Some(now);
        }
    }
}

/// Map-level completion. Ordered: variants only advance forward.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CompletionState {
    #[default]
    Incomplete,
    Transitioning,
    Completed,
}

impl CompletionState {
    /// Move forward to `to`; never regresses.
    pub fn advance(&mut self, to: Self) {
        if to > *self {
            *self = to;
        }
    }
}

impl std::fmt::Display for CompletionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Incomplete => "incomplete",
            Self::Transitioning => "transitioning",
            Self::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Progress through one skill map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapProgress {
    pub map_id: String,
    #[serde(default)]
    pub completion_state: CompletionState,
    #[serde(default)]
    pub activity_state: HashMap<String, ActivityState>,
}

impl MapProgress {
    pub fn new(map_id: impl Into<String>) -> Self {
        Self {
            map_id: map_id.into(),
            completion_state: CompletionState::Incomplete,
            activity_state: HashMap::new(),
        }
    }
}

/// Address of one activity record inside a [`UserState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPath<'a> {
    pub source: &'a str,
    pub map_id: &'a str,
    pub activity_id: &'a str,
}

impl<'a> ProgressPath<'a> {
    pub const fn new(source: &'a str, map_id: &'a str, activity_id: &'a str) -> Self {
        Self {
            source,
            map_id,
            activity_id,
        }
    }
}

/// A learner's progress across every page source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub version: String,
    pub id: String,
    #[serde(default)]
    pub is_debug: bool,
    #[serde(default)]
    pub map_progress: HashMap<String, SourceProgress>,
    #[serde(default)]
    pub completed_tags: HashMap<String, TagCounts>,
}

impl Default for UserState {
    fn default() -> Self {
        Self::generate()
    }
}

impl UserState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            version: USER_VERSION.to_string(),
            id: id.into(),
            is_debug: false,
            map_progress: HashMap::new(),
            completed_tags: HashMap::new(),
        }
    }

    /// Fresh user with a random id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn source_progress(&self, source: &str) -> Option<&SourceProgress> {
        self.map_progress.get(source)
    }

    pub fn map_progress_for(&self, source: &str, map_id: &str) -> Option<&MapProgress> {
        self.map_progress.get(source)?.get(map_id)
    }

    pub fn activity_progress(&self, path: ProgressPath<'_>) -> Option<&ActivityState> {
        self.map_progress_for(path.source, path.map_id)?
            .activity_state
            .get(path.activity_id)
    }

    /// Existing map record, or an incomplete one inserted for `map_id`.
    pub fn upsert_map(&mut self, source: &str, map_id: &str) -> &mut MapProgress {
        self.map_progress
            .entry(source.to_string())
            .or_default()
            .entry(map_id.to_string())
            .or_insert_with(|| MapProgress::new(map_id))
    }

    /// Existing activity record, or a not-completed one inserted at `path`.
    pub fn upsert_activity(&mut self, path: ProgressPath<'_>) -> &mut ActivityState {
        self.upsert_map(path.source, path.map_id)
            .activity_state
            .entry(path.activity_id.to_string())
            .or_insert_with(|| ActivityState::new(path.activity_id))
    }

    /// Drop all progress and tags recorded for `source`, leaving it empty.
    pub fn clear_source(&mut self, source: &str) {
        self.map_progress.insert(source.to_string(), SourceProgress::new());
        self.completed_tags.insert(source.to_string(), TagCounts::new());
    }
}
