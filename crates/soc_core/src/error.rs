use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape returned by every fallible triage operation.
///
/// `code` is the stable machine-readable identifier; `details` carries the offending field and
/// value so a host can render a user-facing message without re-deriving context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

/// Error taxonomy derived from [`AppError::code`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    UnknownAlert,
    UnknownAction,
    InvalidClassification,
    InvalidTransition,
    Io,
}

pub const CODE_VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const CODE_ALERT_UNKNOWN: &str = "ALERT_UNKNOWN";
pub const CODE_ACTION_UNKNOWN: &str = "ACTION_UNKNOWN";
pub const CODE_FEEDBACK_INVALID_CLASSIFICATION: &str = "FEEDBACK_INVALID_CLASSIFICATION";
pub const CODE_STATUS_INVALID_TRANSITION: &str = "STATUS_INVALID_TRANSITION";
pub const CODE_ACTION_ALREADY_DECIDED: &str = "ACTION_ALREADY_DECIDED";

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn unknown_alert(alert_id: &str) -> Self {
        AppError::new(CODE_ALERT_UNKNOWN, "Alert not found in the supplied collection")
            .with_details(format!("alertId={alert_id}"))
    }

    pub fn invalid_transition(message: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::new(CODE_STATUS_INVALID_TRANSITION, message).with_details(details)
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code.as_str() {
            CODE_ALERT_UNKNOWN => ErrorKind::UnknownAlert,
            CODE_ACTION_UNKNOWN => ErrorKind::UnknownAction,
            CODE_FEEDBACK_INVALID_CLASSIFICATION => ErrorKind::InvalidClassification,
            CODE_STATUS_INVALID_TRANSITION | CODE_ACTION_ALREADY_DECIDED => {
                ErrorKind::InvalidTransition
            }
            c if c.starts_with("SOURCE_") || c.starts_with("AUDIT_EXPORT_") => ErrorKind::Io,
            _ => ErrorKind::Validation,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
