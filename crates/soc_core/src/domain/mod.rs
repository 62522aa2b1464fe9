use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LoginAnomaly,
    Phishing,
    CredentialTheft,
    Malware,
    DataExfiltration,
}

impl AlertType {
    pub const ALL: [AlertType; 5] = [
        AlertType::LoginAnomaly,
        AlertType::Phishing,
        AlertType::CredentialTheft,
        AlertType::Malware,
        AlertType::DataExfiltration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::LoginAnomaly => "login_anomaly",
            AlertType::Phishing => "phishing",
            AlertType::CredentialTheft => "credential_theft",
            AlertType::Malware => "malware",
            AlertType::DataExfiltration => "data_exfiltration",
        }
    }
}

/// Ordinal severity band. Variant order is most severe first, so ordered maps iterate
/// critical → low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critical,
        RiskLevel::High,
        RiskLevel::Medium,
        RiskLevel::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Investigating,
    Resolved,
    FalsePositive,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 4] = [
        AlertStatus::Pending,
        AlertStatus::Investigating,
        AlertStatus::Resolved,
        AlertStatus::FalsePositive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Investigating => "investigating",
            AlertStatus::Resolved => "resolved",
            AlertStatus::FalsePositive => "false_positive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetSensitivity {
    High,
    Medium,
    Low,
}

impl AssetSensitivity {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetSensitivity::High => "high",
            AssetSensitivity::Medium => "medium",
            AssetSensitivity::Low => "low",
        }
    }
}

/// User or entity the alert is about. Descriptive only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Indicator {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedAction {
    pub id: String,
    pub action: String,
    pub rationale: String,
    /// Set exactly once when an analyst approves or rejects the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<ActionDecision>,
}

/// Canonical alert representation consumed by the aggregator and the lifecycle functions.
///
/// Notes:
/// - `risk_score` is kept as a wide integer so out-of-range inputs survive decoding and are
///   reported by validation instead of being clamped.
/// - `risk_level` must match the configured band for `risk_score`; neither field is trusted
///   on its own.
/// - `related_alerts` may name ids that are not in the current collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,
    pub alert_type: AlertType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub risk_score: i64,
    pub risk_level: RiskLevel,
    pub status: AlertStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub subject: Subject,
    pub source_ip: String,
    pub location: String,
    pub asset_sensitivity: AssetSensitivity,
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default)]
    pub recommended_actions: Vec<RecommendedAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_alerts: Vec<String>,
}

impl AlertRecord {
    pub fn recommended_action(&self, action_id: &str) -> Option<&RecommendedAction> {
        self.recommended_actions.iter().find(|a| a.id == action_id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    TruePositive,
    FalsePositive,
    BenignPositive,
}

/// One analyst's classification of one alert. Informational: it never changes the alert's status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    pub alert_id: String,
    pub analyst_id: String,
    pub classification: Classification,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Success,
    Failure,
}

impl AuditResult {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditResult::Success => "success",
            AuditResult::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub actor_id: String,
    pub action: String,
    pub resource_id: String,
    pub result: AuditResult,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
