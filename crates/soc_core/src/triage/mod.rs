//! Analyst workflows: each call performs one state-changing action and records its outcome in
//! the audit trail, success or failure. Alert collections are never modified in place; the
//! caller swaps in the returned collection.

use crate::audit::{
    AuditEvent, AuditTrail, ACTION_ALERT_APPROVED, ACTION_ALERT_REJECTED,
    ACTION_FEEDBACK_SUBMITTED, ACTION_STATUS_CHANGED,
};
use crate::domain::{ActionDecision, AlertRecord, AlertStatus, AuditResult, FeedbackSubmission};
use crate::error::AppError;
use crate::feedback::record_feedback;
use crate::lifecycle::{apply_transition, decide_action, replace_alert};

/// Append the result of `outcome` to the trail and hand the outcome back.
///
/// If the audit append is rejected (empty actor) after a successful action, the audit error is
/// returned: an action without a valid audit record is not allowed to succeed. A failed action
/// always reports its own error, with any audit rejection appended to `details`.
fn audited<T>(
    trail: &mut AuditTrail,
    event: AuditEvent,
    outcome: Result<T, AppError>,
    success_details: impl FnOnce(&T) -> String,
) -> Result<T, AppError> {
    match outcome {
        Ok(value) => {
            let details = success_details(&value);
            trail.append(event.with_details(details))?;
            Ok(value)
        }
        Err(err) => {
            let appended = trail.append(
                event
                    .with_result(AuditResult::Failure)
                    .with_details(err.to_string()),
            );
            match appended {
                Ok(_) => Err(err),
                // The action's own error is the one the caller needs; note the lost audit record.
                Err(audit_err) => {
                    let details = match err.details.as_deref() {
                        Some(d) => format!("{d}; audit={audit_err}"),
                        None => format!("audit={audit_err}"),
                    };
                    Err(err.with_details(details))
                }
            }
        }
    }
}

fn decide(
    alerts: &[AlertRecord],
    alert_id: &str,
    action_id: &str,
    actor_id: &str,
    decision: ActionDecision,
    trail: &mut AuditTrail,
) -> Result<Vec<AlertRecord>, AppError> {
    let (tag, verb) = match decision {
        ActionDecision::Approved => (ACTION_ALERT_APPROVED, "Approved"),
        ActionDecision::Rejected => (ACTION_ALERT_REJECTED, "Rejected"),
    };
    let outcome = replace_alert(alerts, alert_id, |a| decide_action(a, action_id, decision));
    audited(
        trail,
        AuditEvent::new(actor_id, tag, alert_id),
        outcome,
        |next: &Vec<AlertRecord>| {
            let label = next
                .iter()
                .find(|a| a.id == alert_id)
                .and_then(|a| a.recommended_action(action_id))
                .map(|a| a.action.clone())
                .unwrap_or_else(|| action_id.to_string());
            format!("{verb} recommended action {action_id}: {label}")
        },
    )
}

pub fn approve_action(
    alerts: &[AlertRecord],
    alert_id: &str,
    action_id: &str,
    actor_id: &str,
    trail: &mut AuditTrail,
) -> Result<Vec<AlertRecord>, AppError> {
    decide(alerts, alert_id, action_id, actor_id, ActionDecision::Approved, trail)
}

pub fn reject_action(
    alerts: &[AlertRecord],
    alert_id: &str,
    action_id: &str,
    actor_id: &str,
    trail: &mut AuditTrail,
) -> Result<Vec<AlertRecord>, AppError> {
    decide(alerts, alert_id, action_id, actor_id, ActionDecision::Rejected, trail)
}

pub fn change_status(
    alerts: &[AlertRecord],
    alert_id: &str,
    to: AlertStatus,
    actor_id: &str,
    trail: &mut AuditTrail,
) -> Result<Vec<AlertRecord>, AppError> {
    let from = alerts.iter().find(|a| a.id == alert_id).map(|a| a.status);
    let outcome = apply_transition(alerts, alert_id, to);
    audited(
        trail,
        AuditEvent::new(actor_id, ACTION_STATUS_CHANGED, alert_id),
        outcome,
        |_| match from {
            Some(from) => format!("Status changed from {} to {}", from.as_str(), to.as_str()),
            None => format!("Status changed to {}", to.as_str()),
        },
    )
}

pub fn submit_feedback(
    alerts: &[AlertRecord],
    alert_id: &str,
    analyst_id: &str,
    classification: &str,
    notes: &str,
    trail: &mut AuditTrail,
) -> Result<FeedbackSubmission, AppError> {
    let outcome = record_feedback(alerts, alert_id, analyst_id, classification, notes);
    audited(
        trail,
        AuditEvent::new(analyst_id, ACTION_FEEDBACK_SUBMITTED, alert_id),
        outcome,
        |s: &FeedbackSubmission| {
            if s.notes.trim().is_empty() {
                format!("Classified as {}", s.classification.as_str())
            } else {
                format!("Classified as {} with notes", s.classification.as_str())
            }
        },
    )
}
