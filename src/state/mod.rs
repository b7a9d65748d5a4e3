//! Top-level session state and the progress reducer.
//!
//! [`SkillMapState`] is the whole store. It is only ever replaced, never
//! mutated in place, by [`reduce`]; [`Store`] threads it through a single
//! dispatch point.

pub mod action;
pub mod reducer;
pub mod store;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::map::SkillMap;
use crate::core::progress::UserState;

pub use action::Action;
pub use reducer::{reduce, should_allow_code_carryover};
pub use store::{Clock, FixedClock, Store, SystemClock};

pub const DEFAULT_TITLE: &str = "Game Maker Guide";
pub const DEFAULT_DESCRIPTION: &str =
    "Level up your game making skills by completing the tutorials in this guide.";
pub const DEFAULT_SOURCE_URL: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalType {
    RestartWarning,
    Completion,
    ReportAbuse,
    Reset,
    Carryover,
    Share,
    Login,
    DeleteAccount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSourceStatus {
    Approved,
    Banned,
    #[default]
    Unknown,
}

/// Lifecycle of the open activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorStage {
    Active,
    /// The host editor is persisting the open project.
    Saving,
}

/// The activity currently open in the editor. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorViewState {
    pub current_map_id: String,
    pub current_activity_id: String,
    /// `None` means start from a fresh project.
    pub current_header_id: Option<String>,
    pub allow_code_carryover: bool,
    pub previous_header_id: Option<String>,
    pub state: EditorStage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalState {
    #[serde(rename = "type")]
    pub kind: ModalType,
    pub current_map_id: Option<String>,
    pub current_activity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    pub map_id: String,
    pub activity_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareState {
    pub header_id: Option<String>,
    pub url: Option<String>,
}

/// Opaque profile handed over by the sign-in collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub signed_in: bool,
    pub profile: Option<UserProfile>,
    pub preferences: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGraphTheme {
    pub background_color: String,
    pub path_color: String,
    pub stroke_color: String,
    pub reward_node_color: String,
    pub reward_node_foreground: String,
    pub unlocked_node_color: String,
    pub unlocked_node_foreground: String,
    pub locked_node_color: String,
    pub locked_node_foreground: String,
    pub completed_node_color: String,
    pub completed_node_foreground: String,
    pub selected_stroke_color: String,
    pub path_opacity: f32,
}

impl Default for SkillGraphTheme {
    fn default() -> Self {
        Self {
            background_color: "var(--body-background-color)".to_string(),
            path_color: "#BFBFBF".to_string(),
            stroke_color: "#000000".to_string(),
            reward_node_color: "var(--primary-color)".to_string(),
            reward_node_foreground: "#000000".to_string(),
            unlocked_node_color: "var(--secondary-color)".to_string(),
            unlocked_node_foreground: "#000000".to_string(),
            locked_node_color: "#BFBFBF".to_string(),
            locked_node_foreground: "#000000".to_string(),
            completed_node_color: "var(--secondary-color)".to_string(),
            completed_node_foreground: "#000000".to_string(),
            selected_stroke_color: "var(--hover-color)".to_string(),
            path_opacity: 0.5,
        }
    }
}

/// State for the whole page session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMapState {
    pub title: String,
    pub description: String,
    pub info_url: Option<String>,
    pub background_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub user: UserState,
    pub page_source_url: String,
    pub page_source_status: PageSourceStatus,
    pub alternate_source_urls: Option<Vec<String>>,
    pub maps: HashMap<String, SkillMap>,
    pub selected_item: Option<SelectedItem>,
    pub share_state: Option<ShareState>,
    /// `None` means the map overview is shown.
    pub editor_view: Option<EditorViewState>,
    pub modal: Option<ModalState>,
    pub show_profile: bool,
    pub theme: SkillGraphTheme,
    pub auth: AuthState,
}

impl Default for SkillMapState {
    fn default() -> Self {
        Self::with_user(UserState::generate())
    }
}

impl SkillMapState {
    pub fn with_user(user: UserState) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            info_url: None,
            background_image_url: None,
            banner_image_url: None,
            user,
            page_source_url: DEFAULT_SOURCE_URL.to_string(),
            page_source_status: PageSourceStatus::Unknown,
            alternate_source_urls: None,
            maps: HashMap::new(),
            selected_item: None,
            share_state: None,
            editor_view: None,
            modal: None,
            show_profile: false,
            theme: SkillGraphTheme::default(),
            auth: AuthState::default(),
        }
    }

    pub fn map(&self, map_id: &str) -> Option<&SkillMap> {
        self.maps.get(map_id)
    }

    /// Loaded maps sorted by id.
    pub fn sorted_maps(&self) -> Vec<&SkillMap> {
        let mut maps: Vec<_> = self.maps.values().collect();
        maps.sort_by(|a, b| a.map_id.cmp(&b.map_id));
        maps
    }
}
