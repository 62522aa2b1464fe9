use crate::audit::AuditTrail;
use crate::config::RiskBandPolicy;
use crate::domain::{AlertRecord, AuditLogEntry};
use crate::error::AppError;
use crate::source::parse_alert_snapshot;
use crate::validate::ensure_valid_alerts;

// Sanitized, deterministic dataset: five alerts covering every status except false_positive,
// plus the audit history shown on the compliance view. Timestamps are fixed RFC3339 values.
const DEMO_ALERTS_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/demo/alerts.json"
));

const DEMO_AUDIT_LOG_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/demo/audit_log.json"
));

pub fn demo_alerts() -> Result<Vec<AlertRecord>, AppError> {
    let alerts = parse_alert_snapshot(DEMO_ALERTS_JSON)?;
    ensure_valid_alerts(&alerts, &RiskBandPolicy::default())?;
    Ok(alerts)
}

pub fn demo_audit_trail() -> Result<AuditTrail, AppError> {
    let entries: Vec<AuditLogEntry> = serde_json::from_str(DEMO_AUDIT_LOG_JSON).map_err(|e| {
        AppError::new(
            "VALIDATION_SNAPSHOT_DECODE_FAILED",
            "Failed to decode demo audit log",
        )
        .with_details(e.to_string())
    })?;
    AuditTrail::from_entries(entries)
}
