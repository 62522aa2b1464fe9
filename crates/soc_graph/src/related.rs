use serde::Serialize;
use soc_core::domain::AlertRecord;
use soc_core::error::AppError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RelatedAlerts<'a> {
    /// Related alerts present in the snapshot, in the anchor's reference order.
    pub found: Vec<&'a AlertRecord>,
    /// Referenced ids with no matching alert in the snapshot.
    pub dangling: Vec<String>,
}

/// Resolve the anchor alert's `related_alerts` against the snapshot.
///
/// Duplicate references and self-references are ignored. Missing targets are reported, not
/// treated as errors; only a missing anchor fails.
pub fn resolve_related<'a>(
    alerts: &'a [AlertRecord],
    alert_id: &str,
) -> Result<RelatedAlerts<'a>, AppError> {
    let anchor = alerts
        .iter()
        .find(|a| a.id == alert_id)
        .ok_or_else(|| AppError::unknown_alert(alert_id))?;

    let mut seen: Vec<&str> = Vec::new();
    let mut found = Vec::new();
    let mut dangling = Vec::new();

    for id in &anchor.related_alerts {
        if id == &anchor.id || seen.contains(&id.as_str()) {
            continue;
        }
        seen.push(id.as_str());
        match alerts.iter().find(|a| &a.id == id) {
            Some(a) => found.push(a),
            None => dangling.push(id.clone()),
        }
    }

    Ok(RelatedAlerts { found, dangling })
}
