use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    User,
    Ip,
    Email,
    Asset,
    Threat,
}

impl NodeKind {
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::User => "user",
            NodeKind::Ip => "ip",
            NodeKind::Email => "email",
            NodeKind::Asset => "asset",
            NodeKind::Threat => "threat",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphNode {
    // "<kind>:<natural key>", e.g. "ip:10.0.1.45"
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Threat node for an alert id that is referenced but not present in the snapshot.
    #[serde(default)]
    pub dangling: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

pub const EDGE_TARGETED: &str = "TARGETED";
pub const EDGE_CONNECTED_FROM: &str = "CONNECTED_FROM";
pub const EDGE_HAS_EMAIL: &str = "HAS_EMAIL";
pub const EDGE_ACCESSED: &str = "ACCESSED";
pub const EDGE_RELATED_TO: &str = "RELATED_TO";

/// Nodes sorted by id, edges sorted by (source, label, target).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationshipGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
