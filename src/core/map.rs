//! Skill map documents.
//!
//! A [`SkillMap`] is a DAG of [`MapNode`]s rooted at `root`. Maps are loaded
//! from content documents and never mutated by the progress engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of node in a skill map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A practicable activity (tutorial, challenge).
    Activity,
    /// A milestone reward that auto-completes when reached.
    Reward,
    /// End-of-map marker that auto-completes when reached.
    Completion,
}

/// A single node in a skill map graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    pub activity_id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub display_name: String,
    /// Successor node ids.
    #[serde(default)]
    pub next: Vec<String>,
    /// Content url for activities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub allow_code_carryover: bool,
}

impl MapNode {
    pub fn activity(activity_id: impl Into<String>) -> Self {
        Self::with_kind(activity_id, NodeKind::Activity)
    }

    pub fn reward(activity_id: impl Into<String>) -> Self {
        Self::with_kind(activity_id, NodeKind::Reward)
    }

    pub fn completion(activity_id: impl Into<String>) -> Self {
        Self::with_kind(activity_id, NodeKind::Completion)
    }

    fn with_kind(activity_id: impl Into<String>, kind: NodeKind) -> Self {
        let activity_id = activity_id.into();
        Self {
            display_name: activity_id.clone(),
            activity_id,
            kind,
            next: Vec::new(),
            url: None,
            tags: Vec::new(),
            allow_code_carryover: false,
        }
    }

    #[must_use]
    pub fn with_next<I, S>(mut self, next: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next = next.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_carryover(mut self, allow: bool) -> Self {
        self.allow_code_carryover = allow;
        self
    }
}

/// A learning path: nodes keyed by activity id plus the entry node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMap {
    pub map_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entry node id.
    pub root: String,
    #[serde(default)]
    pub activities: HashMap<String, MapNode>,
}

impl SkillMap {
    /// Build a map from its nodes. The first node becomes the root.
    pub fn new(map_id: impl Into<String>, nodes: Vec<MapNode>) -> Self {
        let map_id = map_id.into();
        let root = nodes
            .first()
            .map(|node| node.activity_id.clone())
            .unwrap_or_default();
        let activities = nodes
            .into_iter()
            .map(|node| (node.activity_id.clone(), node))
            .collect();
        Self {
            display_name: map_id.clone(),
            map_id,
            description: None,
            root,
            activities,
        }
    }

    pub fn node(&self, activity_id: &str) -> Option<&MapNode> {
        self.activities.get(activity_id)
    }

    pub fn root_node(&self) -> Option<&MapNode> {
        self.node(&self.root)
    }

    /// Direct successors of a node. Dangling ids are skipped.
    pub fn successors<'a>(&'a self, node: &'a MapNode) -> impl Iterator<Item = &'a MapNode> + 'a {
        node.next.iter().filter_map(|id| self.activities.get(id))
    }

    /// Nodes that list `activity_id` in their `next`.
    pub fn parents<'a>(&'a self, activity_id: &'a str) -> impl Iterator<Item = &'a MapNode> + 'a {
        self.activities
            .values()
            .filter(move |node| node.next.iter().any(|id| id == activity_id))
    }
}
