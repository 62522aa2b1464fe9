use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{AuditLogEntry, AuditResult};
use crate::error::{AppError, CODE_VALIDATION_FAILED};

pub const ACTION_ALERT_APPROVED: &str = "ALERT_APPROVED";
pub const ACTION_ALERT_REJECTED: &str = "ALERT_REJECTED";
pub const ACTION_FEEDBACK_SUBMITTED: &str = "FEEDBACK_SUBMITTED";
pub const ACTION_STATUS_CHANGED: &str = "STATUS_CHANGED";
pub const ACTION_POLICY_UPDATED: &str = "POLICY_UPDATED";

/// Input for one audit append. Defaults to a successful action with no details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub actor_id: String,
    pub action: String,
    pub resource_id: String,
    pub result: AuditResult,
    pub details: String,
}

impl AuditEvent {
    pub fn new(
        actor_id: impl Into<String>,
        action: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            action: action.into(),
            resource_id: resource_id.into(),
            result: AuditResult::Success,
            details: String::new(),
        }
    }

    pub fn with_result(mut self, result: AuditResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditSummary {
    pub total: i64,
    pub success: i64,
    pub failure: i64,
    /// `None` when the trail is empty.
    pub success_rate_pct: Option<i64>,
}

/// Append-only audit log.
///
/// Entries are kept in call order and are never edited, removed or reordered. `append`
/// takes `&mut self`, so a shared trail needs a single writer on the host side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrail {
    entries: Vec<AuditLogEntry>,
    ids: HashSet<String>,
    next_seq: u64,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::new(CODE_VALIDATION_FAILED, format!("Audit entry requires {field}"))
                .with_details(format!("field={field}; value={value:?}")),
        );
    }
    Ok(())
}

impl AuditTrail {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            ids: HashSet::new(),
            next_seq: 1,
        }
    }

    /// Seed a trail with existing history, kept in the given order.
    pub fn from_entries(entries: Vec<AuditLogEntry>) -> Result<Self, AppError> {
        let mut ids = HashSet::new();
        for e in &entries {
            require_non_empty("id", &e.id)?;
            require_non_empty("actorId", &e.actor_id)?;
            require_non_empty("action", &e.action)?;
            if !ids.insert(e.id.clone()) {
                return Err(AppError::new(
                    "VALIDATION_DUPLICATE_AUDIT_ID",
                    "Audit history contains a duplicate entry id",
                )
                .with_details(format!("field=id; value={}", e.id)));
            }
        }
        let next_seq = entries.len() as u64 + 1;
        Ok(Self {
            entries,
            ids,
            next_seq,
        })
    }

    pub fn append(&mut self, event: AuditEvent) -> Result<&AuditLogEntry, AppError> {
        self.append_at(event, OffsetDateTime::now_utc())
    }

    pub fn append_at(
        &mut self,
        event: AuditEvent,
        at: OffsetDateTime,
    ) -> Result<&AuditLogEntry, AppError> {
        require_non_empty("actorId", &event.actor_id)?;
        require_non_empty("action", &event.action)?;

        let id = self.allocate_id();
        self.ids.insert(id.clone());
        self.entries.push(AuditLogEntry {
            id,
            timestamp: at,
            actor_id: event.actor_id,
            action: event.action,
            resource_id: event.resource_id,
            result: event.result,
            details: event.details,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    fn allocate_id(&mut self) -> String {
        loop {
            let candidate = format!("AUD-{:03}", self.next_seq);
            self.next_seq += 1;
            if !self.ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn for_resource(&self, resource_id: &str) -> Vec<&AuditLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.resource_id == resource_id)
            .collect()
    }

    pub fn summary(&self) -> AuditSummary {
        let total = self.entries.len() as i64;
        let success = self
            .entries
            .iter()
            .filter(|e| e.result == AuditResult::Success)
            .count() as i64;
        let failure = total - success;
        // Integer percentage, rounded down.
        let success_rate_pct = if total == 0 {
            None
        } else {
            Some(success * 100 / total)
        };
        AuditSummary {
            total,
            success,
            failure,
            success_rate_pct,
        }
    }

    /// CSV rendering for compliance review: header row, then entries in insertion order.
    pub fn export_csv(&self) -> Result<String, AppError> {
        let mut w = csv::Writer::from_writer(Vec::new());
        w.write_record(["id", "timestamp", "actor_id", "action", "resource_id", "result", "details"])
            .map_err(|e| {
                AppError::new("AUDIT_EXPORT_FAILED", "Failed to write audit CSV header")
                    .with_details(e.to_string())
            })?;

        for e in &self.entries {
            let ts = e.timestamp.format(&Rfc3339).map_err(|err| {
                AppError::new("AUDIT_EXPORT_FAILED", "Failed to format audit timestamp")
                    .with_details(format!("id={}; err={err}", e.id))
            })?;
            w.write_record([
                e.id.as_str(),
                ts.as_str(),
                e.actor_id.as_str(),
                e.action.as_str(),
                e.resource_id.as_str(),
                e.result.as_str(),
                e.details.as_str(),
            ])
            .map_err(|err| {
                AppError::new("AUDIT_EXPORT_FAILED", "Failed to write audit CSV row")
                    .with_details(format!("id={}; err={err}", e.id))
            })?;
        }

        let bytes = w.into_inner().map_err(|e| {
            AppError::new("AUDIT_EXPORT_FAILED", "Failed to flush audit CSV")
                .with_details(e.to_string())
        })?;
        String::from_utf8(bytes).map_err(|e| {
            AppError::new("AUDIT_EXPORT_FAILED", "Audit CSV is not valid UTF-8")
                .with_details(e.to_string())
        })
    }

    pub fn export_csv_to_path(&self, path: &Path) -> Result<(), AppError> {
        let text = self.export_csv()?;
        std::fs::write(path, text).map_err(|e| {
            AppError::new("AUDIT_EXPORT_WRITE_FAILED", "Failed to write audit CSV file")
                .with_details(format!("path={}; err={e}", path.display()))
                .with_retryable(true)
        })
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a AuditTrail {
    type Item = &'a AuditLogEntry;
    type IntoIter = std::slice::Iter<'a, AuditLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
