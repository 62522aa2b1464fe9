use soc_core::audit::AuditTrail;
use soc_core::demo::demo_alerts;
use soc_core::domain::{ActionDecision, AlertStatus, AuditResult, Classification};
use soc_core::error::ErrorKind;
use soc_core::triage::{approve_action, change_status, reject_action, submit_feedback};

#[test]
fn approving_an_action_records_success() {
    let alerts = demo_alerts().expect("demo");
    let mut trail = AuditTrail::new();

    let next = approve_action(&alerts, "ALT-2025-001", "ACT-001", "analyst@company.com", &mut trail)
        .expect("approve");

    let updated = next.iter().find(|a| a.id == "ALT-2025-001").unwrap();
    assert_eq!(
        updated.recommended_action("ACT-001").unwrap().decision,
        Some(ActionDecision::Approved)
    );
    assert_eq!(alerts[0].recommended_action("ACT-001").unwrap().decision, None);

    assert_eq!(trail.len(), 1);
    let entry = &trail.entries()[0];
    assert_eq!(entry.action, "ALERT_APPROVED");
    assert_eq!(entry.resource_id, "ALT-2025-001");
    assert_eq!(entry.actor_id, "analyst@company.com");
    assert_eq!(entry.result, AuditResult::Success);
    assert!(entry.details.contains("Enforce Step-Up MFA"));
}

#[test]
fn second_decision_is_audited_as_failure() {
    let alerts = demo_alerts().expect("demo");
    let mut trail = AuditTrail::new();

    let next = reject_action(&alerts, "ALT-2025-003", "ACT-007", "analyst", &mut trail).unwrap();
    let err = approve_action(&next, "ALT-2025-003", "ACT-007", "analyst", &mut trail).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);

    let results: Vec<(&str, AuditResult)> = trail
        .iter()
        .map(|e| (e.action.as_str(), e.result))
        .collect();
    assert_eq!(
        results,
        vec![
            ("ALERT_REJECTED", AuditResult::Success),
            ("ALERT_APPROVED", AuditResult::Failure),
        ]
    );
    assert!(trail.entries()[1].details.contains("ACTION_ALREADY_DECIDED"));
}

#[test]
fn status_changes_are_audited_both_ways() {
    let alerts = demo_alerts().expect("demo");
    let mut trail = AuditTrail::new();

    let next = change_status(&alerts, "ALT-2025-002", AlertStatus::Resolved, "lead", &mut trail)
        .expect("resolve");
    assert_eq!(next[1].status, AlertStatus::Resolved);
    assert_eq!(
        trail.entries()[0].details,
        "Status changed from investigating to resolved"
    );

    let err = change_status(&next, "ALT-2025-002", AlertStatus::Pending, "lead", &mut trail)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    assert_eq!(trail.entries()[1].result, AuditResult::Failure);

    let err = change_status(&next, "ALT-404", AlertStatus::Investigating, "lead", &mut trail)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAlert);
    assert_eq!(trail.len(), 3);
}

#[test]
fn feedback_submission_is_audited() {
    let alerts = demo_alerts().expect("demo");
    let mut trail = AuditTrail::new();

    let s = submit_feedback(
        &alerts,
        "ALT-2025-004",
        "analyst@company.com",
        "false_positive",
        "Scheduled maintenance",
        &mut trail,
    )
    .expect("feedback");
    assert_eq!(s.classification, Classification::FalsePositive);
    assert_eq!(trail.entries()[0].action, "FEEDBACK_SUBMITTED");
    assert_eq!(trail.entries()[0].details, "Classified as false_positive with notes");

    // Feedback never moves the alert.
    assert_eq!(alerts[3].status, AlertStatus::Resolved);

    let err = submit_feedback(&alerts, "ALT-2025-004", "analyst", "maybe", "", &mut trail)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidClassification);
    assert_eq!(trail.entries()[1].result, AuditResult::Failure);
}

#[test]
fn missing_actor_blocks_the_action() {
    let alerts = demo_alerts().expect("demo");
    let mut trail = AuditTrail::new();
    let err = approve_action(&alerts, "ALT-2025-001", "ACT-002", "", &mut trail).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(trail.is_empty());
}

#[test]
fn failed_action_without_actor_keeps_its_own_error() {
    let alerts = demo_alerts().expect("demo");
    let mut trail = AuditTrail::new();

    let err = submit_feedback(&alerts, "ALT-404", "", "true_positive", "", &mut trail)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAlert);
    let details = err.details.unwrap_or_default();
    assert!(details.contains("alertId=ALT-404"));
    assert!(details.contains("audit="));

    let err = submit_feedback(&alerts, "ALT-2025-001", "", "true_positive", "", &mut trail)
        .unwrap_err();
    assert_eq!(err.message, "Feedback requires an analyst id");
    assert!(err.details.unwrap_or_default().contains("field=analystId"));

    assert!(trail.is_empty());
}
