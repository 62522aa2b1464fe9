use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::RiskBandPolicy;
use crate::domain::{AlertRecord, ValidationWarning};
use crate::error::{AppError, CODE_VALIDATION_FAILED};

/// Validate a single alert according to record rules:
/// non-empty id, score within 0..=100, level consistent with the score band, and unique
/// non-empty recommended action ids.
pub fn validate_alert(alert: &AlertRecord, policy: &RiskBandPolicy) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if alert.id.trim().is_empty() {
        warnings.push(
            ValidationWarning::new("VALIDATION_EMPTY_ID", "Alert id must not be empty")
                .with_details(format!("field=id; value={:?}", alert.id)),
        );
    }

    let score_in_range = (0..=100).contains(&alert.risk_score);
    if !score_in_range {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_RISK_SCORE_OUT_OF_RANGE",
                format!("riskScore out of range for alert {}", alert.id),
            )
            .with_details(format!("field=riskScore; value={}", alert.risk_score)),
        );
    }

    // A mismatch is only meaningful once the score itself is known to be sane.
    if score_in_range {
        let expected = policy.level_for(alert.risk_score);
        if expected != alert.risk_level {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_RISK_LEVEL_MISMATCH",
                    format!("riskLevel contradicts riskScore banding for alert {}", alert.id),
                )
                .with_details(format!(
                    "field=riskLevel; value={}; riskScore={}; expected={}",
                    alert.risk_level.as_str(),
                    alert.risk_score,
                    expected.as_str()
                )),
            );
        }
    }

    let mut seen_actions = HashSet::new();
    for action in &alert.recommended_actions {
        if action.id.trim().is_empty() {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_EMPTY_ACTION_ID",
                    format!("Recommended action without id on alert {}", alert.id),
                )
                .with_details(format!("field=recommendedActions.id; action={}", action.action)),
            );
        } else if !seen_actions.insert(action.id.as_str()) {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_DUPLICATE_ACTION_ID",
                    format!("Duplicate recommended action id on alert {}", alert.id),
                )
                .with_details(format!("field=recommendedActions.id; value={}", action.id)),
            );
        }
    }

    warnings
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertValidationReportItem {
    pub index: usize,
    pub id: String,
    pub warnings: Vec<ValidationWarning>,
}

/// Validate a whole collection, including id uniqueness across records.
///
/// One report item per alert, in collection order; clean alerts get an empty warning list.
pub fn validate_alerts(
    alerts: &[AlertRecord],
    policy: &RiskBandPolicy,
) -> Vec<AlertValidationReportItem> {
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    let mut out = Vec::with_capacity(alerts.len());

    for (index, alert) in alerts.iter().enumerate() {
        let mut warnings = validate_alert(alert, policy);
        if !alert.id.trim().is_empty() {
            if let Some(first) = first_seen.get(alert.id.as_str()) {
                warnings.push(
                    ValidationWarning::new(
                        "VALIDATION_DUPLICATE_ID",
                        format!("Alert id {} appears more than once", alert.id),
                    )
                    .with_details(format!(
                        "field=id; value={}; first_index={first}; index={index}",
                        alert.id
                    )),
                );
            } else {
                first_seen.insert(alert.id.as_str(), index);
            }
        }
        out.push(AlertValidationReportItem {
            index,
            id: alert.id.clone(),
            warnings,
        });
    }

    out
}

/// Fail fast on the first malformed record. Nothing is coerced or dropped.
pub fn ensure_valid_alerts(alerts: &[AlertRecord], policy: &RiskBandPolicy) -> Result<(), AppError> {
    for item in validate_alerts(alerts, policy) {
        if let Some(w) = item.warnings.into_iter().next() {
            let mut details = format!("index={}; code={}", item.index, w.code);
            if let Some(d) = w.details {
                details.push_str("; ");
                details.push_str(&d);
            }
            return Err(AppError::new(CODE_VALIDATION_FAILED, w.message).with_details(details));
        }
    }
    Ok(())
}
