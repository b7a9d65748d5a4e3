//! UserState schema upgrades and cross-source progress migration.
//!
//! Persisted user records are read as raw JSON because older schema versions
//! have a different shape. Upgrades never fail: unknown fields are dropped,
//! malformed entries are skipped, and missing fields take their defaults.

use chrono::{DateTime, Utc};
use semver::Version;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::core::graph::get_completed_tags;
use crate::core::map::SkillMap;
use crate::core::progress::{
    ActivityState, CompletionState, MapProgress, SourceProgress, TagCounts, UserState,
};

/// Inputs an upgrade step may need besides the record itself.
pub struct UpgradeContext<'a> {
    /// Page source the record is being loaded under.
    pub source: &'a str,
    pub maps: &'a [&'a SkillMap],
}

pub struct UserMigration {
    pub from: &'static str,
    pub to: &'static str,
    pub apply: fn(Value, &UpgradeContext<'_>) -> Value,
}

pub struct MigrationRegistry {
    migrations: Vec<UserMigration>,
}

impl MigrationRegistry {
    pub fn with_defaults() -> Self {
        Self {
            migrations: vec![
                UserMigration {
                    from: "0.0.0",
                    to: "0.0.1",
                    apply: nest_progress_under_source,
                },
                UserMigration {
                    from: "0.0.1",
                    to: "0.0.2",
                    apply: add_completed_tags,
                },
            ],
        }
    }

    pub fn find(&self, from: &Version) -> Option<&UserMigration> {
        self.migrations
            .iter()
            .find(|m| parse_version(m.from).as_ref() == Some(from))
    }
}

/// Upgrade a persisted user record to `current_version`.
///
/// Already-current records pass through unchanged apart from defaulting, so
/// applying this twice yields the same result as applying it once.
pub fn apply_user_upgrades<'a, I>(
    raw: Value,
    current_version: &str,
    source: &str,
    maps: I,
) -> UserState
where
    I: IntoIterator<Item = &'a SkillMap>,
{
    let maps: Vec<&SkillMap> = maps.into_iter().collect();
    let ctx = UpgradeContext {
        source,
        maps: &maps,
    };

    let mut value = match raw {
        Value::Object(_) => raw,
        Value::Null => Value::Object(Map::new()),
        other => {
            warn!(kind = %json_kind(&other), "user record is not an object; starting fresh");
            Value::Object(Map::new())
        }
    };

    let Some(target) = parse_version(current_version) else {
        warn!(version = current_version, "unparseable target user version");
        let mut user = decode_user(&value);
        user.version = current_version.to_string();
        return user;
    };

    let mut version = record_version(&value);
    let registry = MigrationRegistry::with_defaults();

    while version < target {
        let Some(step) = registry.find(&version) else {
            warn!(from = %version, to = %target, "no upgrade step; defaulting remaining fields");
            break;
        };
        info!(from = step.from, to = step.to, "upgrading user record");
        value = (step.apply)(value, &ctx);
        match parse_version(step.to) {
            Some(next) => version = next,
            None => break,
        }
    }

    let mut user = decode_user(&value);
    user.version = current_version.to_string();
    user
}

/// Carry progress from `alternates` into `active` without overwriting it.
///
/// Alternates are applied in order, so an earlier alternate wins over a
/// later one for the same map id or tag.
pub fn apply_user_migrations(
    mut user: UserState,
    active: &str,
    alternates: &[String],
) -> UserState {
    for alternate in alternates {
        if alternate == active {
            continue;
        }

        if let Some(progress) = user.map_progress.get(alternate).cloned() {
            let target = user.map_progress.entry(active.to_string()).or_default();
            let mut copied = 0usize;
            for (map_id, map_progress) in progress {
                if !target.contains_key(&map_id) {
                    target.insert(map_id, map_progress);
                    copied += 1;
                }
            }
            if copied > 0 {
                info!(from = %alternate, to = active, maps = copied, "migrated map progress");
            }
        }

        if let Some(tags) = user.completed_tags.get(alternate).cloned() {
            let target = user.completed_tags.entry(active.to_string()).or_default();
            for (tag, count) in tags {
                target.entry(tag).or_insert(count);
            }
        }
    }
    user
}

fn nest_progress_under_source(mut value: Value, ctx: &UpgradeContext<'_>) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };

    let progress = obj
        .remove("mapProgress")
        .unwrap_or_else(|| Value::Object(Map::new()));

    let versioned = obj.contains_key("version");
    let nested = match progress {
        Value::Object(entries)
            if entries.is_empty() || (!versioned && looks_nested(&entries)) =>
        {
            Value::Object(entries)
        }
        Value::Object(entries) => {
            debug!(maps = entries.len(), source = ctx.source, "nesting legacy map progress");
            let mut by_source = Map::new();
            by_source.insert(ctx.source.to_string(), Value::Object(entries));
            Value::Object(by_source)
        }
        _ => Value::Object(Map::new()),
    };
    obj.insert("mapProgress".to_string(), nested);
    value
}

fn add_completed_tags(mut value: Value, ctx: &UpgradeContext<'_>) -> Value {
    let user = decode_user(&value);
    let tags = get_completed_tags(&user, ctx.source, ctx.maps.iter().copied());

    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let completed = obj
        .entry("completedTags")
        .or_insert_with(|| Value::Object(Map::new()));
    if !completed.is_object() {
        *completed = Value::Object(Map::new());
    }
    if let Some(by_source) = completed.as_object_mut() {
        by_source
            .entry(ctx.source.to_string())
            .or_insert_with(|| serde_json::json!(tags));
    }
    value
}

/// Legacy records keyed progress directly by map id. A version-less record
/// is only taken as already namespaced when every entry is an object of
/// objects and none carries a map progress field.
fn looks_nested(entries: &Map<String, Value>) -> bool {
    entries.values().all(|entry| {
        entry.as_object().is_some_and(|maps| {
            MAP_PROGRESS_KEYS.iter().all(|key| !maps.contains_key(*key))
                && maps.values().all(Value::is_object)
        })
    })
}

const MAP_PROGRESS_KEYS: &[&str] = &["mapId", "completionState", "activityState"];

fn parse_version(raw: &str) -> Option<Version> {
    Version::parse(raw.trim()).ok()
}

fn record_version(value: &Value) -> Version {
    value
        .get("version")
        .and_then(Value::as_str)
        .and_then(parse_version)
        .unwrap_or_else(|| Version::new(0, 0, 0))
}

/// Decode whatever is usable from a record already in the current shape.
fn decode_user(value: &Value) -> UserState {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map_or_else(|| UserState::generate().id, str::to_string);

    let mut user = UserState::new(id);
    user.is_debug = value
        .get("isDebug")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if let Some(sources) = value.get("mapProgress").and_then(Value::as_object) {
        for (source, maps) in sources {
            let Some(maps) = maps.as_object() else {
                warn!(source = %source, "skipping malformed source progress");
                continue;
            };
            let decoded: SourceProgress = maps
                .iter()
                .filter_map(|(map_id, raw)| {
                    decode_map_progress(map_id, raw).map(|p| (map_id.clone(), p))
                })
                .collect();
            user.map_progress.insert(source.clone(), decoded);
        }
    }

    if let Some(sources) = value.get("completedTags").and_then(Value::as_object) {
        for (source, tags) in sources {
            let Some(tags) = tags.as_object() else {
                continue;
            };
            let decoded: TagCounts = tags
                .iter()
                .filter_map(|(tag, count)| {
                    count
                        .as_u64()
                        .map(|c| (tag.clone(), u32::try_from(c).unwrap_or(u32::MAX)))
                })
                .collect();
            user.completed_tags.insert(source.clone(), decoded);
        }
    }

    user
}

fn decode_map_progress(map_id: &str, raw: &Value) -> Option<MapProgress> {
    let Some(obj) = raw.as_object() else {
        warn!(map_id, "dropping malformed map progress");
        return None;
    };

    // The key is authoritative; a stored `mapId` may be stale.
    let mut progress = MapProgress::new(map_id);
    progress.completion_state = match obj.get("completionState") {
        None | Some(Value::Null) => CompletionState::Incomplete,
        Some(state) => serde_json::from_value(state.clone()).unwrap_or_else(|_| {
            warn!(map_id, state = %state, "unknown completion state; treating as incomplete");
            CompletionState::Incomplete
        }),
    };

    if let Some(activities) = obj.get("activityState").and_then(Value::as_object) {
        for (activity_id, entry) in activities {
            match decode_activity_state(activity_id, entry) {
                Some(state) => {
                    progress.activity_state.insert(activity_id.clone(), state);
                }
                None => {
                    warn!(map_id, activity_id = %activity_id, "dropping malformed activity state");
                }
            }
        }
    }

    Some(progress)
}

/// Each field is read on its own; an unreadable field falls back to its
/// default instead of discarding the entry.
fn decode_activity_state(activity_id: &str, raw: &Value) -> Option<ActivityState> {
    let obj = raw.as_object()?;
    let mut state = ActivityState::new(activity_id);
    state.is_completed = obj
        .get("isCompleted")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    state.header_id = obj
        .get("headerId")
        .and_then(Value::as_str)
        .map(str::to_string);
    state.current_step = obj.get("currentStep").and_then(as_step);
    state.max_steps = obj.get("maxSteps").and_then(as_step);
    state.completed_time = obj
        .get("completedTime")
        .and_then(as_millis)
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    Some(state)
}

fn as_step(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|step| u32::try_from(step).ok())
}

#[allow(clippy::cast_possible_truncation)]
fn as_millis(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
