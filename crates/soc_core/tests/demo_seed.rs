use soc_core::config::RiskBandPolicy;
use soc_core::demo::{demo_alerts, demo_audit_trail};
use soc_core::domain::{AlertStatus, AuditResult};
use soc_core::validate::validate_alerts;

#[test]
fn demo_alerts_are_clean_and_cover_the_feed() {
    let alerts = demo_alerts().expect("demo");
    assert_eq!(alerts.len(), 5);

    let report = validate_alerts(&alerts, &RiskBandPolicy::default());
    assert_eq!(report.len(), alerts.len());
    assert!(
        report.iter().all(|item| item.warnings.is_empty()),
        "expected clean demo alerts: {report:?}"
    );

    let statuses: Vec<AlertStatus> = alerts.iter().map(|a| a.status).collect();
    assert!(statuses.contains(&AlertStatus::Pending));
    assert!(statuses.contains(&AlertStatus::Investigating));
    assert!(statuses.contains(&AlertStatus::Resolved));

    assert!(alerts.iter().all(|a| !a.recommended_actions.is_empty()));
    assert!(alerts
        .iter()
        .flat_map(|a| a.recommended_actions.iter())
        .all(|r| r.decision.is_none()));
}

#[test]
fn demo_related_links_include_dangling_references() {
    let alerts = demo_alerts().expect("demo");
    let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
    let dangling: Vec<&str> = alerts
        .iter()
        .flat_map(|a| a.related_alerts.iter())
        .map(String::as_str)
        .filter(|r| !ids.contains(r))
        .collect();
    assert_eq!(dangling, vec!["ALT-2025-008", "ALT-2025-009"]);
}

#[test]
fn demo_audit_trail_is_seeded_in_order() {
    let trail = demo_audit_trail().expect("trail");
    let ids: Vec<&str> = trail.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["AUD-001", "AUD-002", "AUD-003", "AUD-004"]);
    assert!(trail.iter().all(|e| e.result == AuditResult::Success));
    assert_eq!(trail.summary().success_rate_pct, Some(100));
}
