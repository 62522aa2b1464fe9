use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use soc_core::config::RiskBandPolicy;
use soc_core::demo::demo_alerts;
use soc_core::error::ErrorKind;
use soc_graph::graph::{build_relationship_graph, edge_id, NodeKind, RelationshipGraph};
use soc_graph::related::resolve_related;

fn demo_graph() -> RelationshipGraph {
    let alerts = demo_alerts().expect("demo");
    build_relationship_graph(&alerts, &RiskBandPolicy::default()).expect("graph")
}

#[test]
fn demo_graph_has_expected_shape() {
    let g = demo_graph();

    let count = |kind: NodeKind| g.nodes.iter().filter(|n| n.kind == kind).count();
    assert_eq!(count(NodeKind::Threat), 7);
    assert_eq!(count(NodeKind::User), 5);
    assert_eq!(count(NodeKind::Ip), 5);
    assert_eq!(count(NodeKind::Email), 5);
    // Both IT alerts sit on high-sensitivity assets and share one bucket.
    assert_eq!(count(NodeKind::Asset), 4);
    assert_eq!(g.edges.len(), 23);

    let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn every_edge_endpoint_is_a_node() {
    let g = demo_graph();
    let ids: BTreeSet<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
    for e in &g.edges {
        assert!(ids.contains(e.source.as_str()), "missing source {}", e.source);
        assert!(ids.contains(e.target.as_str()), "missing target {}", e.target);
        assert_eq!(e.id, edge_id(&e.source, &e.label, &e.target));
    }
}

#[test]
fn dangling_related_ids_become_placeholders() {
    let g = demo_graph();
    let dangling: Vec<&str> = g
        .nodes
        .iter()
        .filter(|n| n.dangling)
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(dangling, vec!["threat:ALT-2025-008", "threat:ALT-2025-009"]);

    let related: Vec<&str> = g
        .edges_from("threat:ALT-2025-002")
        .filter(|e| e.label == "RELATED_TO")
        .map(|e| e.target.as_str())
        .collect();
    assert_eq!(related, vec!["threat:ALT-2025-001", "threat:ALT-2025-009"]);
}

#[test]
fn threat_nodes_carry_alert_facts() {
    let g = demo_graph();
    let t = g.node("threat:ALT-2025-004").expect("threat node");
    assert!(!t.dangling);
    assert_eq!(t.data.get("riskScore").map(String::as_str), Some("65"));
    assert_eq!(t.data.get("status").map(String::as_str), Some("resolved"));
    assert_eq!(t.data.get("alertType").map(String::as_str), Some("login_anomaly"));

    let asset = g.node("asset:it:high").expect("asset node");
    assert_eq!(asset.label, "IT assets (high)");
}

#[test]
fn graph_json_uses_type_field() {
    let g = demo_graph();
    let json = g.to_json().expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["nodes"][0]["type"], "asset");

    let again = demo_graph().to_json().unwrap();
    assert_eq!(json, again);
}

#[test]
fn graph_rejects_malformed_snapshot() {
    let mut alerts = demo_alerts().expect("demo");
    alerts[1].risk_score = -3;
    let err = build_relationship_graph(&alerts, &RiskBandPolicy::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn self_reference_adds_no_edge() {
    let mut alerts = demo_alerts().expect("demo");
    alerts[2].related_alerts = vec![alerts[2].id.clone()];
    let g = build_relationship_graph(&alerts, &RiskBandPolicy::default()).unwrap();
    assert_eq!(g.edges_from("threat:ALT-2025-003").filter(|e| e.label == "RELATED_TO").count(), 0);
}

#[test]
fn resolve_related_splits_found_and_dangling() {
    let alerts = demo_alerts().expect("demo");
    let r = resolve_related(&alerts, "ALT-2025-002").expect("related");
    let found: Vec<&str> = r.found.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(found, vec!["ALT-2025-001"]);
    assert_eq!(r.dangling, vec!["ALT-2025-009".to_string()]);

    let none = resolve_related(&alerts, "ALT-2025-003").unwrap();
    assert!(none.found.is_empty() && none.dangling.is_empty());

    let err = resolve_related(&alerts, "ALT-404").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAlert);
}

#[test]
fn resolve_related_ignores_duplicates_and_self() {
    let mut alerts = demo_alerts().expect("demo");
    alerts[4].related_alerts = vec![
        "ALT-2025-001".to_string(),
        "ALT-2025-005".to_string(),
        "ALT-2025-001".to_string(),
        "ALT-2025-404".to_string(),
    ];
    let r = resolve_related(&alerts, "ALT-2025-005").unwrap();
    let found: Vec<&str> = r.found.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(found, vec!["ALT-2025-001"]);
    assert_eq!(r.dangling, vec!["ALT-2025-404".to_string()]);
}
