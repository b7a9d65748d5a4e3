//! Skill map model, progress records, graph queries and schema upgrades.

pub mod graph;
pub mod map;
pub mod migration;
pub mod progress;

pub use graph::{
    ActivityStatus, get_activity_status, get_completed_tags, get_finished_nodes,
    is_activity_completed, is_activity_unlocked, is_map_completed, is_reward_node,
    lookup_activity_progress,
};
pub use map::{MapNode, NodeKind, SkillMap};
pub use migration::{apply_user_migrations, apply_user_upgrades};
pub use progress::{
    ActivityState, CompletionState, MapProgress, ProgressPath, SourceProgress, TagCounts,
    USER_VERSION, UserState,
};
