use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::aggregate::Aggregator;
use crate::domain::{AlertRecord, AlertStatus, AlertType, RiskLevel};
use crate::error::AppError;

pub const DASHBOARD_PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskLevelCount {
    pub risk_level: RiskLevel,
    pub count: i64,
    pub alert_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: AlertStatus,
    pub count: i64,
    pub alert_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertTypeCount {
    pub alert_type: AlertType,
    pub count: i64,
    pub alert_ids: Vec<String>,
}

/// The four headline tiles of the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardHeadline {
    pub critical: i64,
    pub high: i64,
    pub pending: i64,
    pub resolved: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertSummary {
    pub id: String,
    pub title: String,
    pub alert_type: AlertType,
    pub risk_score: i64,
    pub risk_level: RiskLevel,
    pub status: AlertStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub subject_name: String,
    pub source_ip: String,
    pub pending_action_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardPayload {
    pub version: u32,
    pub alert_count: i64,
    pub headline: DashboardHeadline,
    pub risk_level_counts: Vec<RiskLevelCount>,
    pub status_counts: Vec<StatusCount>,
    pub alert_type_counts: Vec<AlertTypeCount>,
    /// Active alerts, highest risk first.
    pub active_feed: Vec<AlertSummary>,
}

fn summarize(a: &AlertRecord) -> AlertSummary {
    AlertSummary {
        id: a.id.clone(),
        title: a.title.clone(),
        alert_type: a.alert_type,
        risk_score: a.risk_score,
        risk_level: a.risk_level,
        status: a.status,
        timestamp: a.timestamp,
        subject_name: a.subject.name.clone(),
        source_ip: a.source_ip.clone(),
        pending_action_count: a
            .recommended_actions
            .iter()
            .filter(|r| r.decision.is_none())
            .count() as i64,
    }
}

fn sorted_ids(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids
}

/// Build the dashboard view model. Every bucket family reconciles to `alert_count`, and bucket
/// ids are sorted so the payload is snapshot-stable. All counts come from the aggregator;
/// hosts render them and never recount.
pub fn build_dashboard(
    aggregator: &Aggregator,
    alerts: &[AlertRecord],
) -> Result<DashboardPayload, AppError> {
    let risk_counts = aggregator.count_by_risk_level(alerts)?;
    let status_counts = aggregator.count_by_status(alerts)?;
    let active = aggregator.active_alerts(alerts)?;

    let mut by_level: BTreeMap<RiskLevel, Vec<String>> =
        RiskLevel::ALL.into_iter().map(|l| (l, Vec::new())).collect();
    let mut by_status: BTreeMap<AlertStatus, Vec<String>> =
        AlertStatus::ALL.into_iter().map(|s| (s, Vec::new())).collect();
    let mut by_type: BTreeMap<AlertType, Vec<String>> =
        AlertType::ALL.into_iter().map(|t| (t, Vec::new())).collect();

    for a in alerts {
        by_level.entry(a.risk_level).or_default().push(a.id.clone());
        by_status.entry(a.status).or_default().push(a.id.clone());
        by_type.entry(a.alert_type).or_default().push(a.id.clone());
    }

    let headline = DashboardHeadline {
        critical: risk_counts.get(&RiskLevel::Critical).copied().unwrap_or(0),
        high: risk_counts.get(&RiskLevel::High).copied().unwrap_or(0),
        pending: status_counts.get(&AlertStatus::Pending).copied().unwrap_or(0),
        resolved: status_counts.get(&AlertStatus::Resolved).copied().unwrap_or(0),
    };

    let mut active_sorted = active;
    active_sorted.sort_by(|a, b| crate::aggregate::risk_order(a, b));

    Ok(DashboardPayload {
        version: DASHBOARD_PAYLOAD_VERSION,
        alert_count: alerts.len() as i64,
        headline,
        risk_level_counts: by_level
            .into_iter()
            .map(|(risk_level, ids)| RiskLevelCount {
                risk_level,
                count: ids.len() as i64,
                alert_ids: sorted_ids(ids),
            })
            .collect(),
        status_counts: by_status
            .into_iter()
            .map(|(status, ids)| StatusCount {
                status,
                count: ids.len() as i64,
                alert_ids: sorted_ids(ids),
            })
            .collect(),
        alert_type_counts: by_type
            .into_iter()
            .map(|(alert_type, ids)| AlertTypeCount {
                alert_type,
                count: ids.len() as i64,
                alert_ids: sorted_ids(ids),
            })
            .collect(),
        active_feed: active_sorted.into_iter().map(summarize).collect(),
    })
}
