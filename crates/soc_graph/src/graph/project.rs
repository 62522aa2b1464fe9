use std::collections::BTreeMap;

use sha2::{Digest, Sha256};
use soc_core::config::RiskBandPolicy;
use soc_core::domain::AlertRecord;
use soc_core::error::AppError;
use soc_core::validate::ensure_valid_alerts;

use super::model::{
    GraphEdge, GraphNode, NodeKind, RelationshipGraph, EDGE_ACCESSED, EDGE_CONNECTED_FROM,
    EDGE_HAS_EMAIL, EDGE_RELATED_TO, EDGE_TARGETED,
};

pub fn node_id(kind: NodeKind, key: &str) -> String {
    format!("{}:{}", kind.prefix(), key)
}

/// Stable edge id: first 16 hex chars of sha256("source|label|target").
pub fn edge_id(source: &str, label: &str, target: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(b"|");
    hasher.update(label.as_bytes());
    hasher.update(b"|");
    hasher.update(target.as_bytes());
    let hex = hex::encode(hasher.finalize());
    hex[..16].to_string()
}

#[derive(Default)]
struct GraphBuilder {
    nodes: BTreeMap<String, GraphNode>,
    edges: BTreeMap<(String, String, String), GraphEdge>,
}

impl GraphBuilder {
    fn node(&mut self, kind: NodeKind, key: &str, label: &str) -> String {
        let id = node_id(kind, key);
        self.nodes.entry(id.clone()).or_insert_with(|| GraphNode {
            id: id.clone(),
            label: label.to_string(),
            kind,
            dangling: false,
            data: BTreeMap::new(),
        });
        id
    }

    fn edge(&mut self, source: &str, label: &str, target: &str) {
        let key = (source.to_string(), label.to_string(), target.to_string());
        self.edges.entry(key).or_insert_with(|| GraphEdge {
            id: edge_id(source, label, target),
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
        });
    }

    fn finish(self) -> RelationshipGraph {
        RelationshipGraph {
            nodes: self.nodes.into_values().collect(),
            edges: self.edges.into_values().collect(),
        }
    }
}

fn asset_key(alert: &AlertRecord) -> String {
    format!(
        "{}:{}",
        alert.subject.department.to_lowercase(),
        alert.asset_sensitivity.as_str()
    )
}

/// Project an alert snapshot into the entity graph handed to the visualizer.
///
/// Entities shared between alerts (same user id, IP, email or asset bucket) collapse into one
/// node. Related ids that are not in the snapshot become dangling threat placeholders instead
/// of errors.
pub fn build_relationship_graph(
    alerts: &[AlertRecord],
    policy: &RiskBandPolicy,
) -> Result<RelationshipGraph, AppError> {
    ensure_valid_alerts(alerts, policy)?;

    let mut b = GraphBuilder::default();

    for alert in alerts {
        let threat = b.node(NodeKind::Threat, &alert.id, &alert.title);
        if let Some(n) = b.nodes.get_mut(&threat) {
            n.data.insert("alertType".to_string(), alert.alert_type.as_str().to_string());
            n.data.insert("riskScore".to_string(), alert.risk_score.to_string());
            n.data.insert("riskLevel".to_string(), alert.risk_level.as_str().to_string());
            n.data.insert("status".to_string(), alert.status.as_str().to_string());
        }

        let user = b.node(NodeKind::User, &alert.subject.id, &alert.subject.name);
        if let Some(n) = b.nodes.get_mut(&user) {
            n.data
                .entry("department".to_string())
                .or_insert_with(|| alert.subject.department.clone());
            n.data
                .entry("role".to_string())
                .or_insert_with(|| alert.subject.role.clone());
        }
        b.edge(&threat, EDGE_TARGETED, &user);

        if !alert.source_ip.trim().is_empty() {
            let ip = b.node(NodeKind::Ip, &alert.source_ip, &alert.source_ip);
            b.edge(&user, EDGE_CONNECTED_FROM, &ip);
        }

        if !alert.subject.email.trim().is_empty() {
            let email = b.node(NodeKind::Email, &alert.subject.email, &alert.subject.email);
            b.edge(&user, EDGE_HAS_EMAIL, &email);
        }

        let asset_label = format!(
            "{} assets ({})",
            alert.subject.department,
            alert.asset_sensitivity.as_str()
        );
        let asset = b.node(NodeKind::Asset, &asset_key(alert), &asset_label);
        b.edge(&user, EDGE_ACCESSED, &asset);
    }

    for alert in alerts {
        let threat = node_id(NodeKind::Threat, &alert.id);
        for related in &alert.related_alerts {
            if related == &alert.id {
                continue;
            }
            let target = node_id(NodeKind::Threat, related);
            if !b.nodes.contains_key(&target) {
                b.nodes.insert(
                    target.clone(),
                    GraphNode {
                        id: target.clone(),
                        label: related.clone(),
                        kind: NodeKind::Threat,
                        dangling: true,
                        data: BTreeMap::new(),
                    },
                );
            }
            b.edge(&threat, EDGE_RELATED_TO, &target);
        }
    }

    Ok(b.finish())
}

impl RelationshipGraph {
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            AppError::new("VALIDATION_GRAPH_ENCODE_FAILED", "Failed to encode relationship graph")
                .with_details(e.to_string())
        })
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_from<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == source)
    }
}
