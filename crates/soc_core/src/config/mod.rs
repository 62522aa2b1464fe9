use serde::{Deserialize, Serialize};

use crate::domain::RiskLevel;
use crate::error::AppError;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 15;

/// Monotonic score → level banding.
///
/// A score maps to the most severe band whose lower bound it reaches; anything below
/// `medium_min` is `low`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiskBandPolicy {
    pub critical_min: i64,
    pub high_min: i64,
    pub medium_min: i64,
}

impl Default for RiskBandPolicy {
    fn default() -> Self {
        Self {
            critical_min: 90,
            high_min: 70,
            medium_min: 40,
        }
    }
}

impl RiskBandPolicy {
    pub fn new(critical_min: i64, high_min: i64, medium_min: i64) -> Result<Self, AppError> {
        let policy = Self {
            critical_min,
            high_min,
            medium_min,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Thresholds must be strictly increasing inside 1..=100 so every band is reachable.
    pub fn validate(&self) -> Result<(), AppError> {
        let ordered = 0 < self.medium_min
            && self.medium_min < self.high_min
            && self.high_min < self.critical_min
            && self.critical_min <= 100;
        if !ordered {
            return Err(AppError::new(
                "VALIDATION_RISK_BANDS_INVALID",
                "Risk band thresholds must satisfy 0 < medium < high < critical <= 100",
            )
            .with_details(format!(
                "criticalMin={}; highMin={}; mediumMin={}",
                self.critical_min, self.high_min, self.medium_min
            )));
        }
        Ok(())
    }

    pub fn level_for(&self, score: i64) -> RiskLevel {
        if score >= self.critical_min {
            RiskLevel::Critical
        } else if score >= self.high_min {
            RiskLevel::High
        } else if score >= self.medium_min {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Host-tunable triage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TriageConfig {
    pub risk_bands: RiskBandPolicy,
    pub refresh_interval_secs: u64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            risk_bands: RiskBandPolicy::default(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl TriageConfig {
    /// Decode a JSON config document. Missing keys fall back to defaults; the result is validated.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let cfg: TriageConfig = serde_json::from_str(json).map_err(|e| {
            AppError::new("VALIDATION_CONFIG_DECODE_FAILED", "Failed to decode triage config")
                .with_details(e.to_string())
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.risk_bands.validate()?;
        if self.refresh_interval_secs == 0 {
            return Err(AppError::new(
                "VALIDATION_REFRESH_INTERVAL_INVALID",
                "Refresh interval must be at least one second",
            )
            .with_details("refreshIntervalSecs=0"));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_secs)
    }
}
