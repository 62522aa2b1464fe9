use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RiskBandPolicy;
use crate::domain::AlertRecord;
use crate::error::AppError;
use crate::validate::ensure_valid_alerts;

/// Decode a JSON array of alert records. Unknown enumeration values, missing fields and
/// malformed timestamps all surface as validation errors.
pub fn parse_alert_snapshot(json: &str) -> Result<Vec<AlertRecord>, AppError> {
    serde_json::from_str::<Vec<AlertRecord>>(json).map_err(|e| {
        AppError::new(
            "VALIDATION_SNAPSHOT_DECODE_FAILED",
            "Failed to decode alert snapshot",
        )
        .with_details(format!("line={}; column={}; err={e}", e.line(), e.column()))
    })
}

/// Something that can hand the host a fresh snapshot of well-formed alerts on demand.
pub trait AlertSource {
    fn snapshot(&self) -> Result<Vec<AlertRecord>, AppError>;
}

/// Fixed in-memory snapshot.
#[derive(Debug, Clone)]
pub struct StaticAlertSource {
    alerts: Vec<AlertRecord>,
}

impl StaticAlertSource {
    pub fn new(alerts: Vec<AlertRecord>, policy: &RiskBandPolicy) -> Result<Self, AppError> {
        ensure_valid_alerts(&alerts, policy)?;
        Ok(Self { alerts })
    }
}

impl AlertSource for StaticAlertSource {
    fn snapshot(&self) -> Result<Vec<AlertRecord>, AppError> {
        Ok(self.alerts.clone())
    }
}

/// Re-reads a JSON snapshot file on every poll.
#[derive(Debug, Clone)]
pub struct JsonFileAlertSource {
    path: PathBuf,
    policy: RiskBandPolicy,
}

impl JsonFileAlertSource {
    pub fn new(path: impl Into<PathBuf>, policy: RiskBandPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AlertSource for JsonFileAlertSource {
    fn snapshot(&self) -> Result<Vec<AlertRecord>, AppError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::new("SOURCE_READ_FAILED", "Failed to read alert snapshot file")
                .with_details(format!("path={}; err={e}", self.path.display()))
                .with_retryable(true)
        })?;
        let alerts = parse_alert_snapshot(&text)?;
        ensure_valid_alerts(&alerts, &self.policy)?;
        debug!(path = %self.path.display(), count = alerts.len(), "loaded alert snapshot");
        Ok(alerts)
    }
}

impl<S: AlertSource + ?Sized> AlertSource for Box<S> {
    fn snapshot(&self) -> Result<Vec<AlertRecord>, AppError> {
        (**self).snapshot()
    }
}
