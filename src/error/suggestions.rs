//! Context-aware error suggestions.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a suggestion for an error, using context when it names the
/// map or activity involved.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::MapNotFound => suggest_map_not_found(context),
        ErrorCode::ActivityNotFound => suggest_activity_not_found(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_map_not_found(context: Option<&Value>) -> String {
    match context.and_then(|c| c.get("map_id")).and_then(Value::as_str) {
        Some(map_id) => format!(
            "Map '{map_id}' is not in the loaded documents. Run `skillmap status` to list loaded maps"
        ),
        None => ErrorCode::MapNotFound.suggestion().to_string(),
    }
}

fn suggest_activity_not_found(context: Option<&Value>) -> String {
    let map_id = context.and_then(|c| c.get("map_id")).and_then(Value::as_str);
    let activity_id = context
        .and_then(|c| c.get("activity_id"))
        .and_then(Value::as_str);

    match (map_id, activity_id) {
        (Some(map_id), Some(activity_id)) => format!(
            "Activity '{activity_id}' is not part of map '{map_id}'. Check the spelling against the map document"
        ),
        _ => ErrorCode::ActivityNotFound.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    match context.and_then(|c| c.get("config_key")).and_then(Value::as_str) {
        Some(key) => format!("Set `{key}` in config.toml or pass it on the command line"),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}
