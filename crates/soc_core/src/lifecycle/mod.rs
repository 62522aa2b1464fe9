//! Alert status state machine and recommended-action decisions.
//!
//! `pending → investigating → {resolved, false_positive}`. There is no way back and terminal
//! states stay terminal. Every function returns a new value; a rejected transition leaves the
//! input exactly as it was.

use crate::domain::{ActionDecision, AlertRecord, AlertStatus};
use crate::error::{AppError, CODE_ACTION_ALREADY_DECIDED, CODE_ACTION_UNKNOWN};

impl AlertStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AlertStatus::Resolved | AlertStatus::FalsePositive)
    }

    pub fn allowed_next(self) -> &'static [AlertStatus] {
        match self {
            AlertStatus::Pending => &[AlertStatus::Investigating],
            AlertStatus::Investigating => &[AlertStatus::Resolved, AlertStatus::FalsePositive],
            AlertStatus::Resolved | AlertStatus::FalsePositive => &[],
        }
    }

    pub fn can_transition_to(self, to: AlertStatus) -> bool {
        self.allowed_next().contains(&to)
    }
}

pub fn transition_status(alert: &AlertRecord, to: AlertStatus) -> Result<AlertRecord, AppError> {
    let from = alert.status;
    if !from.can_transition_to(to) {
        let message = if from.is_terminal() {
            format!("Alert {} is {} and cannot change status", alert.id, from.as_str())
        } else {
            format!(
                "Alert {} cannot move from {} to {}",
                alert.id,
                from.as_str(),
                to.as_str()
            )
        };
        return Err(AppError::invalid_transition(
            message,
            format!(
                "field=status; alertId={}; from={}; to={}",
                alert.id,
                from.as_str(),
                to.as_str()
            ),
        ));
    }

    let mut next = alert.clone();
    next.status = to;
    Ok(next)
}

/// Apply a transition inside a collection and return the replacement collection.
pub fn apply_transition(
    alerts: &[AlertRecord],
    alert_id: &str,
    to: AlertStatus,
) -> Result<Vec<AlertRecord>, AppError> {
    replace_alert(alerts, alert_id, |a| transition_status(a, to))
}

/// Record an approve/reject decision on one of the alert's recommended actions.
///
/// Each action can be decided once; a second decision (either way) is an invalid transition.
pub fn decide_action(
    alert: &AlertRecord,
    action_id: &str,
    decision: ActionDecision,
) -> Result<AlertRecord, AppError> {
    let Some(pos) = alert.recommended_actions.iter().position(|a| a.id == action_id) else {
        return Err(AppError::new(
            CODE_ACTION_UNKNOWN,
            format!("Alert {} has no recommended action {action_id}", alert.id),
        )
        .with_details(format!("alertId={}; actionId={action_id}", alert.id)));
    };

    if let Some(previous) = alert.recommended_actions[pos].decision {
        return Err(AppError::new(
            CODE_ACTION_ALREADY_DECIDED,
            format!("Recommended action {action_id} was already decided"),
        )
        .with_details(format!(
            "alertId={}; actionId={action_id}; previous={previous:?}; requested={decision:?}",
            alert.id
        )));
    }

    let mut next = alert.clone();
    next.recommended_actions[pos].decision = Some(decision);
    Ok(next)
}

/// Build a new collection where the alert with `alert_id` is replaced by `f(alert)`.
pub(crate) fn replace_alert<F>(
    alerts: &[AlertRecord],
    alert_id: &str,
    f: F,
) -> Result<Vec<AlertRecord>, AppError>
where
    F: FnOnce(&AlertRecord) -> Result<AlertRecord, AppError>,
{
    let pos = alerts
        .iter()
        .position(|a| a.id == alert_id)
        .ok_or_else(|| AppError::unknown_alert(alert_id))?;
    let updated = f(&alerts[pos])?;

    let mut out = alerts.to_vec();
    out[pos] = updated;
    Ok(out)
}
