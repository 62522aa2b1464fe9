use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::RiskBandPolicy;
use crate::domain::{AlertRecord, AlertStatus, RiskLevel};
use crate::error::AppError;
use crate::validate::ensure_valid_alerts;

/// Pure views over an alert collection.
///
/// Every operation validates the full input first and fails on the first malformed record.
/// Inputs are borrowed and never modified; filtered and sorted views borrow from the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregator {
    policy: RiskBandPolicy,
}

impl Aggregator {
    pub fn new(policy: RiskBandPolicy) -> Result<Self, AppError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &RiskBandPolicy {
        &self.policy
    }

    pub fn validate(&self, alerts: &[AlertRecord]) -> Result<(), AppError> {
        ensure_valid_alerts(alerts, &self.policy)
    }

    /// Every level is present in the result (zero-filled); values sum to `alerts.len()`.
    pub fn count_by_risk_level(
        &self,
        alerts: &[AlertRecord],
    ) -> Result<BTreeMap<RiskLevel, i64>, AppError> {
        self.validate(alerts)?;
        let mut counts: BTreeMap<RiskLevel, i64> =
            RiskLevel::ALL.into_iter().map(|l| (l, 0)).collect();
        for a in alerts {
            *counts.entry(a.risk_level).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub fn count_by_status(
        &self,
        alerts: &[AlertRecord],
    ) -> Result<BTreeMap<AlertStatus, i64>, AppError> {
        self.validate(alerts)?;
        let mut counts: BTreeMap<AlertStatus, i64> =
            AlertStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for a in alerts {
            *counts.entry(a.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub fn filter_by_status<'a>(
        &self,
        alerts: &'a [AlertRecord],
        status: AlertStatus,
    ) -> Result<Vec<&'a AlertRecord>, AppError> {
        self.validate(alerts)?;
        Ok(alerts.iter().filter(|a| a.status == status).collect())
    }

    pub fn filter_by_risk_level<'a>(
        &self,
        alerts: &'a [AlertRecord],
        level: RiskLevel,
    ) -> Result<Vec<&'a AlertRecord>, AppError> {
        self.validate(alerts)?;
        Ok(alerts.iter().filter(|a| a.risk_level == level).collect())
    }

    /// Everything not yet resolved. False positives stay visible until someone resolves the
    /// underlying alert set.
    pub fn active_alerts<'a>(
        &self,
        alerts: &'a [AlertRecord],
    ) -> Result<Vec<&'a AlertRecord>, AppError> {
        self.validate(alerts)?;
        Ok(alerts
            .iter()
            .filter(|a| a.status != AlertStatus::Resolved)
            .collect())
    }

    /// Highest score first; equal scores put the earlier timestamp first, then id ascending.
    pub fn sort_by_risk<'a>(
        &self,
        alerts: &'a [AlertRecord],
    ) -> Result<Vec<&'a AlertRecord>, AppError> {
        self.validate(alerts)?;
        let mut out: Vec<&AlertRecord> = alerts.iter().collect();
        out.sort_by(|a, b| risk_order(a, b));
        Ok(out)
    }

    /// Newest first; equal timestamps fall back to id ascending.
    pub fn sort_by_recency<'a>(
        &self,
        alerts: &'a [AlertRecord],
    ) -> Result<Vec<&'a AlertRecord>, AppError> {
        self.validate(alerts)?;
        let mut out: Vec<&AlertRecord> = alerts.iter().collect();
        out.sort_by(|a, b| recency_order(a, b));
        Ok(out)
    }

    /// Case-insensitive substring search over the descriptive fields. An empty (or
    /// whitespace-only) query matches everything. Original order is kept.
    pub fn search<'a>(
        &self,
        alerts: &'a [AlertRecord],
        query: &str,
    ) -> Result<Vec<&'a AlertRecord>, AppError> {
        self.validate(alerts)?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(alerts.iter().collect());
        }
        Ok(alerts.iter().filter(|a| matches_query(a, &needle)).collect())
    }
}

pub(crate) fn risk_order(a: &AlertRecord, b: &AlertRecord) -> Ordering {
    b.risk_score
        .cmp(&a.risk_score)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
        .then_with(|| a.id.cmp(&b.id))
}

pub(crate) fn recency_order(a: &AlertRecord, b: &AlertRecord) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.id.cmp(&b.id))
}

fn matches_query(alert: &AlertRecord, needle: &str) -> bool {
    [
        alert.id.as_str(),
        alert.title.as_str(),
        alert.description.as_str(),
        alert.subject.name.as_str(),
        alert.subject.email.as_str(),
        alert.source_ip.as_str(),
        alert.location.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
