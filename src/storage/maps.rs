use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::core::map::SkillMap;
use crate::error::{Result, SkillMapError};

/// Parsed content document: optional page metadata plus its maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapDocument {
    pub title: Option<String>,
    pub description: Option<String>,
    pub maps: Vec<SkillMap>,
}

#[derive(Deserialize)]
struct PageDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    maps: Vec<SkillMap>,
}

enum Shape {
    Array,
    Page,
    Single,
}

/// Read a map document from disk.
pub fn load_maps(path: &Path) -> Result<MapDocument> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        SkillMapError::StorageRead(format!("read maps {}: {err}", path.display()))
    })?;
    let document = parse_maps(&contents)?;
    debug!(path = %path.display(), maps = document.maps.len(), "maps loaded");
    Ok(document)
}

/// Accepted shapes: a single map, an array of maps, or a page object with
/// `title`, `description` and a `maps` array.
pub fn parse_maps(contents: &str) -> Result<MapDocument> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|err| SkillMapError::InvalidMap(format!("parse maps: {err}")))?;

    let shape = match &value {
        Value::Array(_) => Shape::Array,
        Value::Object(object) if object.contains_key("maps") => Shape::Page,
        Value::Object(object) if object.contains_key("mapId") => Shape::Single,
        other => {
            return Err(SkillMapError::InvalidMap(format!(
                "expected a map, an array of maps or a page object, got {}",
                kind_of(other)
            )));
        }
    };

    let document = match shape {
        Shape::Array => MapDocument {
            maps: decode(value)?,
            ..MapDocument::default()
        },
        Shape::Page => {
            let page: PageDocument = decode(value)?;
            MapDocument {
                title: page.title,
                description: page.description,
                maps: page.maps,
            }
        }
        Shape::Single => MapDocument {
            maps: vec![decode(value)?],
            ..MapDocument::default()
        },
    };

    for map in &document.maps {
        validate(map)?;
    }
    Ok(document)
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|err| SkillMapError::InvalidMap(format!("decode maps: {err}")))
}

fn validate(map: &SkillMap) -> Result<()> {
    if map.map_id.is_empty() {
        return Err(SkillMapError::InvalidMap("map with empty mapId".to_string()));
    }
    if map.node(&map.root).is_none() {
        return Err(SkillMapError::InvalidMap(format!(
            "map {} has root {:?} which is not one of its activities",
            map.map_id, map.root
        )));
    }
    if let Some((key, node)) = map
        .activities
        .iter()
        .find(|(key, node)| *key != &node.activity_id)
    {
        return Err(SkillMapError::InvalidMap(format!(
            "map {} lists node {:?} under key {:?}",
            map.map_id, node.activity_id, key
        )));
    }
    Ok(())
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
