use std::collections::BTreeMap;
use std::str::FromStr;

use time::OffsetDateTime;

use crate::domain::{AlertRecord, Classification, FeedbackSubmission};
use crate::error::{AppError, CODE_FEEDBACK_INVALID_CLASSIFICATION, CODE_VALIDATION_FAILED};

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::TruePositive,
        Classification::FalsePositive,
        Classification::BenignPositive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::TruePositive => "true_positive",
            Classification::FalsePositive => "false_positive",
            Classification::BenignPositive => "benign_positive",
        }
    }
}

impl FromStr for Classification {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                AppError::new(
                    CODE_FEEDBACK_INVALID_CLASSIFICATION,
                    "Classification must be true_positive, false_positive or benign_positive",
                )
                .with_details(format!("field=classification; value={s:?}"))
            })
    }
}

/// Validate and build a feedback submission stamped with the current time.
pub fn record_feedback(
    alerts: &[AlertRecord],
    alert_id: &str,
    analyst_id: &str,
    classification: &str,
    notes: &str,
) -> Result<FeedbackSubmission, AppError> {
    record_feedback_at(
        alerts,
        alert_id,
        analyst_id,
        classification,
        notes,
        OffsetDateTime::now_utc(),
    )
}

pub fn record_feedback_at(
    alerts: &[AlertRecord],
    alert_id: &str,
    analyst_id: &str,
    classification: &str,
    notes: &str,
    at: OffsetDateTime,
) -> Result<FeedbackSubmission, AppError> {
    if !alerts.iter().any(|a| a.id == alert_id) {
        return Err(AppError::unknown_alert(alert_id));
    }

    let classification = classification.parse::<Classification>()?;

    if analyst_id.trim().is_empty() {
        return Err(
            AppError::new(CODE_VALIDATION_FAILED, "Feedback requires an analyst id")
                .with_details(format!("field=analystId; alertId={alert_id}")),
        );
    }

    Ok(FeedbackSubmission {
        alert_id: alert_id.to_string(),
        analyst_id: analyst_id.to_string(),
        classification,
        notes: notes.to_string(),
        timestamp: at,
    })
}

/// Tally submissions per classification (zero-filled).
pub fn count_by_classification(submissions: &[FeedbackSubmission]) -> BTreeMap<Classification, i64> {
    let mut out: BTreeMap<Classification, i64> =
        Classification::ALL.into_iter().map(|c| (c, 0)).collect();
    for s in submissions {
        *out.entry(s.classification).or_insert(0) += 1;
    }
    out
}
