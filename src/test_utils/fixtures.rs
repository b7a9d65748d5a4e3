use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use crate::core::map::{MapNode, SkillMap};
use crate::core::progress::UserState;
use crate::state::SkillMapState;

/// Page document with two maps.
///
/// `intro`: basics -> badge (reward) -> loops -> events -> done (completion).
/// `advanced`: physics -> tilemaps, both tagged.
pub const SAMPLE_MAPS_JSON: &str = r#"{
  "title": "Sample Guide",
  "description": "Two short learning paths",
  "maps": [
    {
      "mapId": "intro",
      "displayName": "Getting Started",
      "root": "basics",
      "activities": {
        "basics": { "activityId": "basics", "kind": "activity", "next": ["badge"], "tags": ["sprites"] },
        "badge": { "activityId": "badge", "kind": "reward", "next": ["loops"] },
        "loops": { "activityId": "loops", "kind": "activity", "next": ["events"], "tags": ["loops"], "allowCodeCarryover": true },
        "events": { "activityId": "events", "kind": "activity", "next": ["done"] },
        "done": { "activityId": "done", "kind": "completion" }
      }
    },
    {
      "mapId": "advanced",
      "displayName": "Going Further",
      "root": "physics",
      "activities": {
        "physics": { "activityId": "physics", "kind": "activity", "next": ["tilemaps"], "tags": ["physics"] },
        "tilemaps": { "activityId": "tilemaps", "kind": "activity", "tags": ["tilemaps", "physics"] }
      }
    }
  ]
}"#;

/// The maps in [`SAMPLE_MAPS_JSON`], built in code.
pub fn sample_maps() -> Vec<SkillMap> {
    let mut intro = SkillMap::new(
        "intro",
        vec![
            MapNode::activity("basics")
                .with_next(["badge"])
                .with_tags(["sprites"]),
            MapNode::reward("badge").with_next(["loops"]),
            MapNode::activity("loops")
                .with_next(["events"])
                .with_tags(["loops"])
                .with_carryover(true),
            MapNode::activity("events").with_next(["done"]),
            MapNode::completion("done"),
        ],
    );
    intro.display_name = "Getting Started".to_string();

    let mut advanced = SkillMap::new(
        "advanced",
        vec![
            MapNode::activity("physics")
                .with_next(["tilemaps"])
                .with_tags(["physics"]),
            MapNode::activity("tilemaps").with_tags(["tilemaps", "physics"]),
        ],
    );
    advanced.display_name = "Going Further".to_string();

    vec![intro, advanced]
}

/// Default-source state with the sample maps loaded and an empty learner.
pub fn sample_state() -> SkillMapState {
    let mut state = SkillMapState::with_user(UserState::new("learner"));
    for map in sample_maps() {
        state.maps.insert(map.map_id.clone(), map);
    }
    state
}

/// 2023-11-14T22:13:20Z
pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000)
        .single()
        .unwrap_or_default()
}

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    std::fs::write(&path, contents).expect("Failed to write file");
    path
}

/// Isolated directory holding a map document and a learner record.
pub struct ProgressFixture {
    pub temp_dir: TempDir,
    pub maps_path: PathBuf,
    pub user_path: PathBuf,
}

impl ProgressFixture {
    /// Sample maps written to disk; no learner record yet.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let maps_path = write_file(temp_dir.path(), "maps.json", SAMPLE_MAPS_JSON);
        let user_path = temp_dir.path().join("user.json");
        Self {
            temp_dir,
            maps_path,
            user_path,
        }
    }

    /// Replace the learner record with raw JSON.
    pub fn write_user(&self, contents: &str) {
        std::fs::write(&self.user_path, contents).expect("Failed to write user");
    }

    pub fn read_user(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.user_path).expect("Failed to read user");
        serde_json::from_str(&raw).expect("user record is not JSON")
    }
}

impl Default for ProgressFixture {
    fn default() -> Self {
        Self::new()
    }
}
