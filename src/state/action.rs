//! The closed set of intents the reducer accepts.

use serde_json::Value;

use crate::core::map::SkillMap;
use crate::state::{ModalType, PageSourceStatus, SkillGraphTheme, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Maps and metadata
    AddSkillMap(SkillMap),
    ClearSkillMaps,
    ClearMetadata,
    ChangeSelectedItem {
        map_id: String,
        activity_id: String,
    },
    SetSkillMapCompleted {
        map_id: String,
    },

    // Editor lifecycle
    OpenActivity {
        map_id: String,
        activity_id: String,
        carryover_code: bool,
        previous_header_id: Option<String>,
    },
    SaveAndCloseActivity,
    CloseActivity {
        finished: bool,
    },
    RestartActivity {
        map_id: String,
        activity_id: String,
        carryover_code: bool,
        previous_header_id: Option<String>,
    },
    SetHeaderForActivity {
        map_id: String,
        activity_id: String,
        header_id: Option<String>,
        current_step: Option<u32>,
        max_steps: Option<u32>,
        is_completed: bool,
    },

    // User progress
    /// Raw persisted record, possibly from an older schema.
    SetUser(Value),
    ResetUser,
    UpdateUserCompletedTags,

    SetShareStatus {
        header_id: Option<String>,
        url: Option<String>,
    },

    // Page metadata
    SetPageTitle(String),
    SetPageDescription(String),
    SetPageInfoUrl(Option<String>),
    SetPageBackgroundImageUrl(Option<String>),
    SetPageBannerImageUrl(Option<String>),
    SetPageTheme(SkillGraphTheme),
    SetPageSourceUrl {
        url: String,
        status: PageSourceStatus,
    },
    SetPageAlternateUrls(Option<Vec<String>>),

    // Modals and profile
    ShowModal {
        kind: ModalType,
        map_id: Option<String>,
        activity_id: Option<String>,
    },
    HideModal,
    ShowUserProfile,
    HideUserProfile,
    SetUserProfile(Option<UserProfile>),
    SetUserPreferences(Option<Value>),
    UserLogOut,
}

impl Action {
    pub fn open_activity(map_id: impl Into<String>, activity_id: impl Into<String>) -> Self {
        Self::OpenActivity {
            map_id: map_id.into(),
            activity_id: activity_id.into(),
            carryover_code: false,
            previous_header_id: None,
        }
    }

    pub fn restart_activity(map_id: impl Into<String>, activity_id: impl Into<String>) -> Self {
        Self::RestartActivity {
            map_id: map_id.into(),
            activity_id: activity_id.into(),
            carryover_code: false,
            previous_header_id: None,
        }
    }

    pub fn set_header(
        map_id: impl Into<String>,
        activity_id: impl Into<String>,
        header_id: Option<&str>,
        current_step: Option<u32>,
        max_steps: Option<u32>,
        is_completed: bool,
    ) -> Self {
        Self::SetHeaderForActivity {
            map_id: map_id.into(),
            activity_id: activity_id.into(),
            header_id: header_id.map(str::to_string),
            current_step,
            max_steps,
            is_completed,
        }
    }

    pub fn show_modal(kind: ModalType) -> Self {
        Self::ShowModal {
            kind,
            map_id: None,
            activity_id: None,
        }
    }

    pub fn show_activity_modal(
        kind: ModalType,
        map_id: impl Into<String>,
        activity_id: impl Into<String>,
    ) -> Self {
        Self::ShowModal {
            kind,
            map_id: Some(map_id.into()),
            activity_id: Some(activity_id.into()),
        }
    }

    /// Stable intent name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddSkillMap(_) => "ADD_SKILL_MAP",
            Self::ClearSkillMaps => "CLEAR_SKILL_MAPS",
            Self::ClearMetadata => "CLEAR_METADATA",
            Self::ChangeSelectedItem { .. } => "CHANGE_SELECTED_ITEM",
            Self::SetSkillMapCompleted { .. } => "SET_SKILL_MAP_COMPLETED",
            Self::OpenActivity { .. } => "OPEN_ACTIVITY",
            Self::SaveAndCloseActivity => "SAVE_AND_CLOSE_ACTIVITY",
            Self::CloseActivity { .. } => "CLOSE_ACTIVITY",
            Self::RestartActivity { .. } => "RESTART_ACTIVITY",
            Self::SetHeaderForActivity { .. } => "SET_HEADERID_FOR_ACTIVITY",
            Self::SetUser(_) => "SET_USER",
            Self::ResetUser => "RESET_USER",
            Self::UpdateUserCompletedTags => "UPDATE_USER_COMPLETED_TAGS",
            Self::SetShareStatus { .. } => "SET_SHARE_STATUS",
            Self::SetPageTitle(_) => "SET_PAGE_TITLE",
            Self::SetPageDescription(_) => "SET_PAGE_DESCRIPTION",
            Self::SetPageInfoUrl(_) => "SET_PAGE_INFO_URL",
            Self::SetPageBackgroundImageUrl(_) => "SET_PAGE_BACKGROUND_IMAGE_URL",
            Self::SetPageBannerImageUrl(_) => "SET_PAGE_BANNER_IMAGE_URL",
            Self::SetPageTheme(_) => "SET_PAGE_THEME",
            Self::SetPageSourceUrl { .. } => "SET_PAGE_SOURCE_URL",
            Self::SetPageAlternateUrls(_) => "SET_PAGE_ALTERNATE_URLS",
            Self::ShowModal { .. } => "SHOW_MODAL",
            Self::HideModal => "HIDE_MODAL",
            Self::ShowUserProfile => "SHOW_USER_PROFILE",
            Self::HideUserProfile => "HIDE_USER_PROFILE",
            Self::SetUserProfile(_) => "SET_USER_PROFILE",
            Self::SetUserPreferences(_) => "SET_USER_PREFERENCES",
            Self::UserLogOut => "USER_LOG_OUT",
        }
    }
}
